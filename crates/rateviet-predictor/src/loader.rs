//! Model and tokenizer loading
//!
//! The model handle is expensive to create (vocabulary, architecture,
//! fine-tuned weights, device probe), so `ModelLoader` defers it and
//! guarantees the load runs at most once per process regardless of how
//! many requests race on first use. A failed load is not cached: the
//! next request retries.

use crate::model::RatingClassifier;
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::Config as BertConfig;
use hf_hub::{api::sync::Api, Repo, RepoType};
use rateviet_core::{install_dir, DeviceSpec, Error, ModelSourceSpec, ModelSpec, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Resolved locations of the three model artifacts
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Encoder configuration (`config.json`)
    pub config: PathBuf,

    /// Tokenizer vocabulary (`tokenizer.json`)
    pub tokenizer: PathBuf,

    /// Fine-tuned weights (`model.safetensors`)
    pub weights: PathBuf,
}

impl ModelPaths {
    /// Resolve artifact paths from a model specification.
    ///
    /// Relative local directories resolve against the installation
    /// directory; Hub sources download into the shared cache on first use.
    pub fn resolve(spec: &ModelSpec) -> Result<Self> {
        match &spec.source {
            ModelSourceSpec::Local { dir } => {
                let dir = if dir.is_absolute() {
                    dir.clone()
                } else {
                    install_dir().join(dir)
                };

                Ok(Self {
                    config: dir.join(&spec.config_file),
                    tokenizer: dir.join(&spec.tokenizer_file),
                    weights: dir.join(&spec.weights_file),
                })
            }
            ModelSourceSpec::HuggingFace { repo_id, revision } => {
                let api = Api::new().map_err(|e| {
                    Error::model_unavailable(format!("failed to initialize HF API: {e}"))
                })?;

                let repo = api.repo(Repo::with_revision(
                    repo_id.clone(),
                    RepoType::Model,
                    revision.clone().unwrap_or_else(|| "main".to_string()),
                ));

                let fetch = |file: &str| {
                    repo.get(file).map_err(|e| {
                        Error::model_unavailable(format!(
                            "failed to download {file} from {repo_id}: {e}"
                        ))
                    })
                };

                Ok(Self {
                    config: fetch(&spec.config_file)?,
                    tokenizer: fetch(&spec.tokenizer_file)?,
                    weights: fetch(&spec.weights_file)?,
                })
            }
        }
    }

    fn check_present(&self) -> Result<()> {
        for (label, path) in [
            ("config", &self.config),
            ("tokenizer", &self.tokenizer),
            ("weights", &self.weights),
        ] {
            if !path.exists() {
                return Err(Error::model_unavailable(format!(
                    "{label} file not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Loaded classifier, tokenizer, and execution device.
///
/// Created once, then shared read-only by every request for the process
/// lifetime; inference never mutates the weights, so no locking is needed
/// after the load completes.
pub struct ModelHandle {
    pub model: RatingClassifier,
    pub tokenizer: Tokenizer,
    pub device: Device,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

/// At-most-once model loader
pub struct ModelLoader {
    spec: ModelSpec,
    device: DeviceSpec,
    max_length: usize,
    handle: OnceCell<Arc<ModelHandle>>,
}

impl ModelLoader {
    /// Create a loader; nothing is read until the first `ensure_loaded`
    pub fn new(spec: ModelSpec, device: DeviceSpec, max_length: usize) -> Self {
        Self {
            spec,
            device,
            max_length,
            handle: OnceCell::new(),
        }
    }

    /// Get the shared handle, loading it on first use.
    ///
    /// Concurrent first-time callers all await the same in-flight load;
    /// exactly one load executes, and every caller receives the same
    /// handle. On failure the cell stays empty, so a later call retries.
    pub async fn ensure_loaded(&self) -> Result<Arc<ModelHandle>> {
        self.handle
            .get_or_try_init(|| async { self.load().map(Arc::new) })
            .await
            .cloned()
    }

    /// Whether the handle has been created
    pub fn is_loaded(&self) -> bool {
        self.handle.get().is_some()
    }

    fn load(&self) -> Result<ModelHandle> {
        let paths = ModelPaths::resolve(&self.spec)?;
        paths.check_present()?;

        let device = create_device(self.device)?;

        let mut tokenizer = Tokenizer::from_file(&paths.tokenizer)
            .map_err(|e| Error::model_unavailable(format!("failed to load tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: self.max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::model_unavailable(format!("invalid truncation params: {e}")))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        let config: BertConfig = serde_json::from_str(
            &std::fs::read_to_string(&paths.config)
                .map_err(|e| Error::model_unavailable(format!("failed to read config: {e}")))?,
        )
        .map_err(|e| Error::model_unavailable(format!("failed to parse config: {e}")))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&paths.weights], DType::F32, &device)
                .map_err(|e| Error::model_unavailable(format!("failed to load weights: {e}")))?
        };

        let model = RatingClassifier::load(vb, &config)
            .map_err(|e| Error::model_unavailable(format!("failed to build classifier: {e}")))?;

        info!(
            weights = %paths.weights.display(),
            device = ?device,
            "loaded rating classifier"
        );

        Ok(ModelHandle {
            model,
            tokenizer,
            device,
        })
    }
}

/// Pick the execution device once at load time
fn create_device(spec: DeviceSpec) -> Result<Device> {
    match spec {
        DeviceSpec::Auto => {
            if candle_core::utils::cuda_is_available() {
                debug!("CUDA available, using GPU 0");
                Device::new_cuda(0)
                    .map_err(|e| Error::model_unavailable(format!("failed to init CUDA: {e}")))
            } else if candle_core::utils::metal_is_available() {
                debug!("Metal available, using GPU 0");
                Device::new_metal(0)
                    .map_err(|e| Error::model_unavailable(format!("failed to init Metal: {e}")))
            } else {
                debug!("no accelerator available, using CPU");
                Ok(Device::Cpu)
            }
        }
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda { index } => Device::new_cuda(index.unwrap_or(0))
            .map_err(|e| Error::model_unavailable(format!("failed to init CUDA: {e}"))),
        DeviceSpec::Metal { index } => Device::new_metal(index.unwrap_or(0))
            .map_err(|e| Error::model_unavailable(format!("failed to init Metal: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_spec(dir: &std::path::Path) -> ModelSpec {
        ModelSpec {
            source: ModelSourceSpec::Local {
                dir: dir.join("does-not-exist"),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_local_relative_paths() {
        let spec = ModelSpec::default();
        let paths = ModelPaths::resolve(&spec).unwrap();

        assert!(paths.weights.ends_with("models/phobert-rating/model.safetensors"));
        assert!(paths.tokenizer.ends_with("models/phobert-rating/tokenizer.json"));
        assert!(paths.config.ends_with("models/phobert-rating/config.json"));
    }

    #[test]
    fn test_resolve_local_absolute_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = ModelSpec {
            source: ModelSourceSpec::Local {
                dir: tmp.path().to_path_buf(),
            },
            ..Default::default()
        };

        let paths = ModelPaths::resolve(&spec).unwrap();
        assert_eq!(paths.weights, tmp.path().join("model.safetensors"));
    }

    #[tokio::test]
    async fn test_missing_artifacts_fail_without_caching() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new(missing_spec(tmp.path()), DeviceSpec::Cpu, 256);

        let err = loader.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable(_)));
        assert!(!loader.is_loaded());

        // The failure is not cached as permanent: a retry runs the load
        // path again and reports the same condition.
        let err = loader.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable(_)));
        assert!(!loader.is_loaded());
    }

    #[tokio::test]
    async fn test_concurrent_failures_leave_cell_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = Arc::new(ModelLoader::new(
            missing_spec(tmp.path()),
            DeviceSpec::Cpu,
            256,
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.ensure_loaded().await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(matches!(result, Err(Error::ModelUnavailable(_))));
        }
        assert!(!loader.is_loaded());
    }

    #[test]
    fn test_create_device_cpu() {
        let device = create_device(DeviceSpec::Cpu).unwrap();
        assert!(matches!(device, Device::Cpu));
    }
}
