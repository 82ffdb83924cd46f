use addr_verify::app::batch::run_batch;
use addr_verify::domain::ports::VerifierConfigProvider;
use addr_verify::utils::{logger, validation::Validate};
use addr_verify::{AddressVerifier, CliConfig, PlacesClient, RateLimiter};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting addr-verify");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let resolved = config.resolve()?;
    if resolved.api_key.is_none() {
        tracing::warn!("No API key configured, falling back to manual parsing only");
    }

    let limiter = Arc::new(RateLimiter::new(resolved.min_request_interval()));
    let client = PlacesClient::new(&resolved, limiter)?;
    let verifier = AddressVerifier::new(client);

    if let Some(address) = &config.address {
        let verification = verifier.verify_address(address).await?;
        let json = serde_json::to_string_pretty(&verification)
            .context("serializing verification record")?;
        println!("{}", json);
        if verification.verified {
            println!("✅ Verified ({} source, confidence {})",
                verification.verification_source, verification.confidence);
        } else {
            println!(
                "⚠️ Not verified (confidence {}, completeness {})",
                verification.confidence, verification.completeness.score
            );
        }
    }

    if let Some(query) = &config.search {
        let suggestions = verifier.search_places(query, &config.search_types).await?;
        println!(
            "{}",
            serde_json::to_string_pretty(&suggestions).context("serializing suggestions")?
        );
    }

    if let Some(place_id) = &config.details {
        match verifier.get_place_details(place_id).await? {
            Some(details) => println!(
                "{}",
                serde_json::to_string_pretty(&details).context("serializing place details")?
            ),
            None => println!("No details found for place id: {}", place_id),
        }
    }

    if let Some(input) = &config.input {
        let summary = run_batch(&verifier, input, &config.output).await?;
        tracing::info!("✅ Batch verification completed");
        println!(
            "✅ Verified {}/{} addresses",
            summary.verified, summary.total
        );
        println!("📁 Output saved to: {}", summary.output_path);
    }

    Ok(())
}
