//! Configuration for predictor construction and model loading

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for building a predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Which predictor implementation to construct
    #[serde(default)]
    pub mode: PredictorMode,

    /// Model artifact locations
    #[serde(default)]
    pub model: ModelSpec,

    /// Device to run inference on
    #[serde(default)]
    pub device: DeviceSpec,

    /// Token ceiling applied when encoding review text
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Seed for the dummy predictor's RNG (deterministic tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Predictor implementation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorMode {
    /// Placeholder heuristic, no model artifacts required
    Dummy,

    /// Load the model at construction time
    Eager,

    /// Defer the model load to the first prediction
    Lazy,
}

impl Default for PredictorMode {
    fn default() -> Self {
        Self::Lazy
    }
}

/// Model artifact specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Where the model directory comes from
    #[serde(flatten)]
    pub source: ModelSourceSpec,

    /// Weights file name inside the model directory
    #[serde(default = "default_weights_file")]
    pub weights_file: String,

    /// Tokenizer file name inside the model directory
    #[serde(default = "default_tokenizer_file")]
    pub tokenizer_file: String,

    /// Encoder configuration file name inside the model directory
    #[serde(default = "default_config_file")]
    pub config_file: String,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            source: ModelSourceSpec::default(),
            weights_file: default_weights_file(),
            tokenizer_file: default_tokenizer_file(),
            config_file: default_config_file(),
        }
    }
}

/// Model directory source (for config files)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSourceSpec {
    /// Local directory, resolved against the installation directory
    /// when relative
    Local { dir: PathBuf },

    /// Hugging Face Hub repository
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
    },
}

impl Default for ModelSourceSpec {
    fn default() -> Self {
        Self::Local {
            dir: PathBuf::from("models/phobert-rating"),
        }
    }
}

/// Device specification (for config files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    /// Probe for an accelerator once at load time, fall back to CPU
    Auto,
    Cpu,
    Cuda { index: Option<usize> },
    Metal { index: Option<usize> },
}

impl Default for DeviceSpec {
    fn default() -> Self {
        Self::Auto
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            mode: PredictorMode::default(),
            model: ModelSpec::default(),
            device: DeviceSpec::default(),
            max_length: default_max_length(),
            seed: None,
        }
    }
}

impl PredictorConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid config: {e}")))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }
}

/// Directory the service binary was installed to.
///
/// Relative model paths resolve against this, so deployments carry their
/// model artifacts next to the executable.
pub fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_max_length() -> usize {
    256
}

fn default_weights_file() -> String {
    "model.safetensors".to_string()
}

fn default_tokenizer_file() -> String {
    "tokenizer.json".to_string()
}

fn default_config_file() -> String {
    "config.json".to_string()
}
