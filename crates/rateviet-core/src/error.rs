//! Error types for RateViet

/// Result type alias using RateViet's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for RateViet operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model weights or tokenizer artifacts missing/unreadable at load time.
    ///
    /// A failed load is never cached: the next request may retry.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Batch inference requested with zero texts
    #[error("empty batch: at least one comment is required")]
    EmptyBatch,

    /// Tokenization or forward-pass errors
    #[error("inference error: {0}")]
    Inference(String),

    /// Visualization or report assembly failed after inference succeeded
    #[error("report generation failed: {0}")]
    ReportGeneration(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new model-unavailable error
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new report-generation error
    pub fn report(msg: impl Into<String>) -> Self {
        Self::ReportGeneration(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
