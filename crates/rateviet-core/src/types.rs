//! Core types for RateViet

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Raw review text as received from the request layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInput {
    /// The review text
    pub text: String,

    /// Product the review refers to (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_label: Option<String>,
}

impl RawInput {
    /// Create a new raw input without a product label
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            product_label: None,
        }
    }

    /// Attach a product label
    pub fn with_product(mut self, label: impl Into<String>) -> Self {
        self.product_label = Some(label.into());
        self
    }
}

/// A single star-rating prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The original (unpreprocessed) review text
    pub source_text: String,

    /// Predicted star rating, always in 1..=5
    pub rating: u8,

    /// Probability mass the model assigned to the chosen rating, in [0, 1]
    pub confidence: f32,
}

impl PredictionResult {
    /// Create a new prediction result
    pub fn new(source_text: impl Into<String>, rating: u8, confidence: f32) -> Self {
        debug_assert!((1..=5).contains(&rating));
        Self {
            source_text: source_text.into(),
            rating,
            confidence,
        }
    }
}

/// Ordered predictions for a batch of review texts.
///
/// Order is input order; length equals the input batch length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult(pub Vec<PredictionResult>);

impl BatchResult {
    /// Number of predictions in the batch
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch holds no predictions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over predictions in input order
    pub fn iter(&self) -> std::slice::Iter<'_, PredictionResult> {
        self.0.iter()
    }
}

impl IntoIterator for BatchResult {
    type Item = PredictionResult;
    type IntoIter = std::vec::IntoIter<PredictionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a PredictionResult;
    type IntoIter = std::slice::Iter<'a, PredictionResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<PredictionResult> for BatchResult {
    fn from_iter<I: IntoIterator<Item = PredictionResult>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Occurrence count per star rating across a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingDistribution {
    counts: [u64; 5],
}

impl RatingDistribution {
    /// Count of predictions with the given rating (1..=5)
    pub fn count(&self, rating: u8) -> u64 {
        assert!((1..=5).contains(&rating), "rating out of range: {rating}");
        self.counts[(rating - 1) as usize]
    }

    /// Increment the bucket for the given rating
    pub fn record(&mut self, rating: u8) {
        assert!((1..=5).contains(&rating), "rating out of range: {rating}");
        self.counts[(rating - 1) as usize] += 1;
    }

    /// Sum of all buckets; equals the tallied batch length
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate `(rating, count)` pairs for all five buckets, rating ascending
    pub fn buckets(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as u8 + 1, c))
    }
}

// The HTTP layer returns the distribution as a {"1": n, ..., "5": n} map.
impl Serialize for RatingDistribution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map: BTreeMap<String, u64> = self
            .buckets()
            .map(|(rating, count)| (rating.to_string(), count))
            .collect();
        map.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RatingDistribution {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, u64>::deserialize(deserializer)?;
        let mut dist = RatingDistribution::default();
        for (key, count) in map {
            let rating: u8 = key
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid rating key: {key}")))?;
            if !(1..=5).contains(&rating) {
                return Err(serde::de::Error::custom(format!(
                    "rating key out of range: {rating}"
                )));
            }
            dist.counts[(rating - 1) as usize] = count;
        }
        Ok(dist)
    }
}

/// Reference to a rendered word-frequency image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationArtifact {
    /// Caller-generated, collision-free file name
    pub file_name: String,

    /// Location the image was written to
    pub path: PathBuf,
}

/// Assembled report document bytes, generated on demand and never cached
pub type ReportArtifact = Vec<u8>;

/// Marker distinguishing single-comment predictions from batch rows
/// in the persistence collaborator's history table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionKind {
    Single,
    Batch,
}

impl PredictionKind {
    /// Stable string form used by the history store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Batch => "batch",
        }
    }
}

/// One history row handed to the persistence collaborator.
///
/// The core builds these; it never writes to storage itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Product the comment refers to, if known
    pub product_label: Option<String>,

    /// The original comment text
    pub comment: String,

    /// Predicted star rating
    pub rating: u8,

    /// Confidence score for the rating
    pub confidence: f32,

    /// Whether the row came from a single or a batch prediction
    pub kind: PredictionKind,
}

/// Response shape for a single prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinglePredictionResponse {
    pub predicted_rating: u8,
    pub confidence_score: f32,
    pub comment: String,
}

impl From<PredictionResult> for SinglePredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            predicted_rating: result.rating,
            confidence_score: result.confidence,
            comment: result.source_text,
        }
    }
}

/// Response shape for a batch prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPredictionResponse {
    /// Number of comments processed
    pub total_predictions: usize,

    /// Count of predictions per star rating
    pub rating_distribution: RatingDistribution,

    /// Reference to the rendered word-frequency image
    pub visualization_url: String,

    /// Per-item predictions in input order
    pub results: Vec<PredictionResult>,
}
