//! RateViet Core
//!
//! Core types, errors, and configuration shared across RateViet components.
//!
//! This crate provides:
//! - Domain types for predictions, batches, and rating distributions
//! - Error types and result handling
//! - Predictor and model-artifact configuration
//! - Interface shapes exposed to the HTTP and persistence collaborators

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    install_dir, DeviceSpec, ModelSourceSpec, ModelSpec, PredictorConfig, PredictorMode,
};
pub use error::{Error, Result};
pub use types::{
    BatchPredictionResponse, BatchResult, HistoryRecord, PredictionKind, PredictionResult,
    RatingDistribution, RawInput, ReportArtifact, SinglePredictionResponse, VisualizationArtifact,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DeviceSpec, PredictorConfig, PredictorMode};
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        BatchResult, HistoryRecord, PredictionKind, PredictionResult, RatingDistribution,
        RawInput, VisualizationArtifact,
    };
}
