//! RateViet Predictor
//!
//! Star-rating inference for Vietnamese product reviews.
//!
//! The pipeline: raw text is word-segmented the way PhoBERT-style
//! checkpoints expect, encoded with truncation and padding, pushed
//! through the classifier, and the output distribution is mapped to a
//! `(rating, confidence)` pair. The expensive model load is deferred and
//! guarded so it runs at most once per process.

pub mod batch;
pub mod engine;
pub mod loader;
pub mod model;
pub mod predictor;
pub mod preprocess;

pub use batch::{history_record, history_records, BatchOrchestrator};
pub use engine::{InferenceEngine, ScoredRating};
pub use loader::{ModelHandle, ModelLoader, ModelPaths};
pub use model::{RatingClassifier, NUM_RATINGS};
pub use predictor::{predictor_from_config, DummyPredictor, ModelPredictor, Predictor};
pub use preprocess::Segmenter;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::batch::BatchOrchestrator;
    pub use crate::loader::{ModelHandle, ModelLoader};
    pub use crate::predictor::{predictor_from_config, DummyPredictor, ModelPredictor, Predictor};
    pub use crate::preprocess::Segmenter;
}
