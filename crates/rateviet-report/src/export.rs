//! Tabular results export
//!
//! The download-as-CSV byte stream handed back to the HTTP layer for a
//! single response cycle; nothing is persisted here.

use rateviet_core::{BatchResult, Error, Result};

/// Serialize batch results as CSV bytes.
///
/// Columns match the history export the service has always produced:
/// `Comment,Predicted_Rating,Confidence`.
pub fn results_csv(results: &BatchResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Comment", "Predicted_Rating", "Confidence"])
        .map_err(|e| Error::report(format!("failed to write CSV header: {e}")))?;

    for result in results {
        writer
            .write_record([
                result.source_text.as_str(),
                &result.rating.to_string(),
                &format!("{:.2}", result.confidence),
            ])
            .map_err(|e| Error::report(format!("failed to write CSV row: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::report(format!("failed to flush CSV: {e}")))
}
