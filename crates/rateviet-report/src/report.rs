//! Report assembly
//!
//! Composes the per-item results, the rating distribution, and the
//! word-frequency visualization into one self-contained HTML document.
//! The document is produced on demand as a byte stream and never cached;
//! nothing already persisted is touched on failure.

use chrono::{DateTime, Utc};
use rateviet_core::{
    BatchResult, Error, RatingDistribution, ReportArtifact, Result, VisualizationArtifact,
};
use tracing::info;

/// Metadata embedded in the report header
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Who requested the report
    pub requester: String,

    /// When the report was generated
    pub generated_at: DateTime<Utc>,
}

impl ReportMeta {
    /// Metadata for a requester, stamped now
    pub fn for_requester(requester: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            generated_at: Utc::now(),
        }
    }
}

/// Assembles batch prediction reports
#[derive(Debug, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the report document.
    ///
    /// Deterministic for identical inputs apart from the embedded
    /// metadata. An unreadable visualization reference fails the report;
    /// the computed predictions remain valid for the caller.
    pub fn assemble(
        &self,
        results: &BatchResult,
        distribution: &RatingDistribution,
        visualization: &VisualizationArtifact,
        meta: &ReportMeta,
    ) -> Result<ReportArtifact> {
        let image = std::fs::read_to_string(&visualization.path).map_err(|e| {
            Error::report(format!(
                "visualization {} unreadable: {e}",
                visualization.path.display()
            ))
        })?;

        let total = results.len();
        let mut html = String::with_capacity(8192);

        html.push_str("<!DOCTYPE html>\n<html lang=\"vi\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str("<title>Rating Prediction Report</title>\n");
        html.push_str(
            "<style>\n\
             body { font-family: sans-serif; margin: 2rem; color: #1f2328; }\n\
             table { border-collapse: collapse; width: 100%; margin: 1rem 0; }\n\
             th, td { border: 1px solid #d0d7de; padding: 0.4rem 0.6rem; text-align: left; }\n\
             th { background: #f6f8fa; }\n\
             .bar { background: #1f6feb; height: 0.8rem; }\n\
             .meta { color: #57606a; font-size: 0.9rem; }\n\
             </style>\n</head>\n<body>\n",
        );

        html.push_str("<h1>Rating Prediction Report</h1>\n");
        html.push_str(&format!(
            "<p class=\"meta\">Requested by {} · Generated {}</p>\n",
            html_escape(&meta.requester),
            meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        html.push_str(&format!(
            "<h2>Summary</h2>\n<p>Total predictions: <strong>{total}</strong></p>\n"
        ));

        html.push_str("<h2>Rating distribution</h2>\n<table>\n");
        html.push_str("<tr><th>Rating</th><th>Count</th><th></th></tr>\n");
        for (rating, count) in distribution.buckets() {
            let share = if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            html.push_str(&format!(
                "<tr><td>{} ★</td><td>{}</td>\
                 <td style=\"width:50%\"><div class=\"bar\" style=\"width:{:.1}%\"></div></td></tr>\n",
                rating, count, share
            ));
        }
        html.push_str("</table>\n");

        html.push_str("<h2>Word frequency</h2>\n<figure>\n");
        html.push_str(&image);
        html.push_str("\n</figure>\n");

        html.push_str("<h2>Predictions</h2>\n<table>\n");
        html.push_str("<tr><th>#</th><th>Comment</th><th>Rating</th><th>Confidence</th></tr>\n");
        for (index, result) in results.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{} ★</td><td>{:.0}%</td></tr>\n",
                index + 1,
                html_escape(&result.source_text),
                result.rating,
                result.confidence * 100.0
            ));
        }
        html.push_str("</table>\n</body>\n</html>\n");

        info!(
            total,
            requester = %meta.requester,
            bytes = html.len(),
            "assembled prediction report"
        );

        Ok(html.into_bytes())
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
