//! Word-frequency visualization
//!
//! Aggregates word frequencies across a batch of comments (after
//! segmentation, so compounds count as one term) and renders a
//! deterministic SVG image with term size scaled by frequency. The
//! artifact is written under a caller-supplied, collision-free name;
//! concurrent requests never contend because names are disjoint.

use chrono::Utc;
use rateviet_core::{Error, Result, VisualizationArtifact};
use rateviet_predictor::Segmenter;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Function words excluded from the frequency tally
const STOPWORDS: &[&str] = &[
    "anh", "bạn", "bị", "cho", "chị", "chỉ", "các", "có", "cũng", "của", "do", "em", "khi",
    "là", "lại", "lắm", "mà", "mình", "mới", "một", "nên", "nhé", "như", "nhưng", "những",
    "này", "nữa", "quá", "ra", "rất", "rồi", "sẽ", "shop", "thì", "thôi", "tôi", "và", "vào",
    "vậy", "với", "vẫn", "đã", "đó", "được", "ở",
];

/// Categorical palette cycled across terms
const PALETTE: &[&str] = &[
    "#1f6feb", "#d29922", "#2da44e", "#cf222e", "#8250df", "#bf3989", "#1b7c83",
];

const MIN_FONT: f32 = 14.0;
const MAX_FONT: f32 = 64.0;
const MARGIN: f32 = 20.0;

/// Renders word-frequency SVG artifacts for review batches
pub struct WordCloudRenderer {
    segmenter: Segmenter,
    word_pattern: Regex,
    max_terms: usize,
    width: u32,
    height: u32,
}

impl WordCloudRenderer {
    /// Create a renderer with the default 800x500 canvas and 60-term cap
    pub fn new() -> Result<Self> {
        Self::with_dimensions(800, 500, 60)
    }

    /// Create a renderer with an explicit canvas size and term cap
    pub fn with_dimensions(width: u32, height: u32, max_terms: usize) -> Result<Self> {
        let word_pattern = Regex::new(r"[\p{L}\p{N}_]+")
            .map_err(|e| Error::report(format!("invalid word pattern: {e}")))?;

        Ok(Self {
            segmenter: Segmenter::new()?,
            word_pattern,
            max_terms,
            width,
            height,
        })
    }

    /// Tally term frequencies across all comments, most frequent first.
    ///
    /// Ties break alphabetically so the output is deterministic.
    pub fn aggregate(&self, comments: &[String]) -> Vec<(String, u64)> {
        let mut counts: HashMap<String, u64> = HashMap::new();

        for comment in comments {
            let segmented = self.segmenter.segment(comment);
            for m in self.word_pattern.find_iter(&segmented) {
                let term = m.as_str();
                if term.chars().count() < 2 || STOPWORDS.contains(&term) {
                    continue;
                }
                *counts.entry(term.to_string()).or_default() += 1;
            }
        }

        let mut terms: Vec<(String, u64)> = counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(self.max_terms);
        terms
    }

    /// Render the frequency image and write it to `out_dir/artifact_name`.
    ///
    /// Degenerate batches (everything stopworded, repeated single words)
    /// still produce a valid artifact; only the file write can fail.
    pub fn render(
        &self,
        comments: &[String],
        artifact_name: &str,
        out_dir: &Path,
    ) -> Result<VisualizationArtifact> {
        let terms = self.aggregate(comments);
        let svg = self.render_svg(&terms);

        std::fs::create_dir_all(out_dir)
            .map_err(|e| Error::report(format!("failed to create artifact dir: {e}")))?;
        let path = out_dir.join(artifact_name);
        std::fs::write(&path, svg.as_bytes())
            .map_err(|e| Error::report(format!("failed to write visualization: {e}")))?;

        info!(artifact = %path.display(), terms = terms.len(), "rendered word cloud");

        Ok(VisualizationArtifact {
            file_name: artifact_name.to_string(),
            path,
        })
    }

    fn render_svg(&self, terms: &[(String, u64)]) -> String {
        let (width, height) = (self.width as f32, self.height as f32);
        let max_count = terms.first().map(|(_, c)| *c).unwrap_or(1) as f32;

        let mut svg = String::with_capacity(4096);
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
             viewBox=\"0 0 {} {}\">\n",
            self.width, self.height, self.width, self.height
        ));
        svg.push_str(&format!(
            "  <rect width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>\n",
            self.width, self.height
        ));

        // Greedy row layout: biggest terms first, wrap at the right edge.
        let mut x = MARGIN;
        let mut y = MARGIN;
        let mut row_height = 0.0f32;

        for (index, (term, count)) in terms.iter().enumerate() {
            let scale = (*count as f32 / max_count).sqrt();
            let size = MIN_FONT + (MAX_FONT - MIN_FONT) * scale;
            // Compounds were joined with underscores during segmentation;
            // display them with spaces again.
            let display = term.replace('_', " ");
            let estimated_width = display.chars().count() as f32 * size * 0.6;

            if x + estimated_width > width - MARGIN && x > MARGIN {
                x = MARGIN;
                y += row_height * 1.25;
                row_height = 0.0;
            }
            if y + size > height - MARGIN {
                break;
            }

            let color = PALETTE[index % PALETTE.len()];
            svg.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" \
                 font-size=\"{:.1}\" fill=\"{}\">{}</text>\n",
                x,
                y + size,
                size,
                color,
                xml_escape(&display)
            ));

            x += estimated_width + size * 0.5;
            row_height = row_height.max(size);
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Derive a collision-free artifact file name for a requester.
///
/// Concurrent requests from the same user within the same second still
/// get distinct names through the random fragment.
pub fn wordcloud_file_name(requester: &str) -> String {
    let safe: String = requester
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let nonce = uuid::Uuid::new_v4().simple().to_string();

    format!("wordcloud_{}_{}_{}.svg", safe, stamp, &nonce[..8])
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
