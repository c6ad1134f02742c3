use anyhow::Context;

use crate::errors::AppError;
use crate::matching::scoring::JobMatchSummary;

pub const CSV_FILE_NAME: &str = "results.csv";

/// Serializes the recommendation list as CSV, scores printed with two decimals.
pub fn export_csv(matches: &[JobMatchSummary]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["position_title", "company_name", "final_score"])
        .context("failed to write CSV header")?;

    for job in matches {
        let score = format!("{:.2}", job.final_score);
        writer
            .write_record([job.position_title.as_str(), job.company_name.as_str(), score.as_str()])
            .context("failed to write CSV row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV export: {}", e.error()))?;
    Ok(bytes)
}
