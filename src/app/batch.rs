use crate::core::verifier::AddressVerifier;
use crate::domain::ports::GeocodeApi;
use crate::utils::error::{Result, VerifyError};

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub total: usize,
    pub verified: usize,
    pub output_path: String,
}

const OUTPUT_HEADERS: &[&str] = &[
    "address",
    "formatted_address",
    "lat",
    "lng",
    "verified",
    "source",
    "confidence",
    "completeness",
    "issues",
];

/// Verify every row of a CSV with an `address` column and write a summary
/// CSV. Rows run sequentially: the process-wide rate limiter would
/// serialize the outbound calls anyway. Empty-address rows are recorded in
/// the output instead of aborting the run.
pub async fn run_batch<A: GeocodeApi>(
    verifier: &AddressVerifier<A>,
    input_path: &str,
    output_path: &str,
) -> Result<BatchSummary> {
    let mut reader = csv::Reader::from_path(input_path)?;
    let headers = reader.headers()?.clone();
    let address_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("address"))
        .ok_or_else(|| VerifyError::ConfigError {
            message: format!("input file {} has no 'address' column", input_path),
        })?;

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(OUTPUT_HEADERS)?;

    let mut total = 0usize;
    let mut verified = 0usize;

    for record in reader.records() {
        let record = record?;
        let address = record.get(address_idx).unwrap_or("");
        total += 1;

        match verifier.verify_address(address).await {
            Ok(v) => {
                if v.verified {
                    verified += 1;
                }
                writer.write_record(&[
                    v.address.clone(),
                    v.formatted_address.clone(),
                    v.coordinates.lat.to_string(),
                    v.coordinates.lng.to_string(),
                    v.verified.to_string(),
                    v.verification_source.to_string(),
                    v.confidence.to_string(),
                    v.completeness.score.to_string(),
                    v.completeness.issues.join("; "),
                ])?;
            }
            Err(VerifyError::EmptyAddress) => {
                tracing::warn!("row {}: empty address, recording as unverified", total);
                writer.write_record(&[
                    address.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    "false".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    "Empty address".to_string(),
                ])?;
            }
            Err(e) => return Err(e),
        }
    }

    writer.flush()?;
    tracing::info!("batch verification done: {}/{} verified", verified, total);

    Ok(BatchSummary {
        total,
        verified,
        output_path: output_path.to_string(),
    })
}
