//! The predictor capability
//!
//! One trait, interchangeable implementations selected by configuration:
//! a deterministic-under-seed placeholder and the real model in eager or
//! lazy loading mode.

use crate::engine::InferenceEngine;
use crate::loader::ModelLoader;
use crate::preprocess::Segmenter;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rateviet_core::{Error, PredictionResult, PredictorConfig, PredictorMode, Result};
use std::sync::Arc;
use tracing::info;

/// Trait for all rating predictors
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Predict a star rating for one review text.
    ///
    /// The returned result carries the original text as `source_text`.
    async fn predict(&self, text: &str) -> Result<PredictionResult>;

    /// Predict ratings for several texts, preserving input order.
    ///
    /// The default applies `predict` per item; implementations may batch.
    async fn predict_many(&self, texts: &[String]) -> Result<Vec<PredictionResult>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.predict(text).await?);
        }
        Ok(results)
    }

    /// Get the predictor name
    fn name(&self) -> &str;
}

/// Build the predictor selected by configuration.
///
/// `eager` mode performs the model load here; `lazy` defers it to the
/// first prediction; `dummy` needs no artifacts at all.
pub async fn predictor_from_config(config: &PredictorConfig) -> Result<Arc<dyn Predictor>> {
    match config.mode {
        PredictorMode::Dummy => {
            let predictor = match config.seed {
                Some(seed) => DummyPredictor::with_seed(seed),
                None => DummyPredictor::new(),
            };
            Ok(Arc::new(predictor))
        }
        PredictorMode::Eager => {
            let predictor = ModelPredictor::new(config)?;
            predictor.preload().await?;
            Ok(Arc::new(predictor))
        }
        PredictorMode::Lazy => Ok(Arc::new(ModelPredictor::new(config)?)),
    }
}

/// Placeholder predictor used when no model artifacts are deployed.
///
/// Mirrors the length-banded heuristic of the original service stub:
/// short comments skew low, long comments skew high, confidence is
/// uniform in 0.70..0.99 rounded to two decimals.
pub struct DummyPredictor {
    name: String,
    rng: Mutex<StdRng>,
}

impl DummyPredictor {
    /// Create a dummy predictor with an entropy-seeded RNG
    pub fn new() -> Self {
        Self {
            name: "dummy".to_string(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a dummy predictor with a fixed seed, for deterministic tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "dummy".to_string(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for DummyPredictor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Predictor for DummyPredictor {
    async fn predict(&self, text: &str) -> Result<PredictionResult> {
        let mut rng = self.rng.lock();

        let choices: &[u8] = match text.chars().count() {
            0..=19 => &[1, 2, 3],
            20..=49 => &[3, 4],
            _ => &[4, 5],
        };
        let rating = *choices.choose(&mut *rng).expect("non-empty choices");
        let confidence = (rng.gen_range(0.70..0.99f32) * 100.0).round() / 100.0;

        Ok(PredictionResult::new(text, rating, confidence))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Real-model predictor; segmentation, encoding, and the forward pass
/// all run against the shared lazily-created handle.
pub struct ModelPredictor {
    name: String,
    loader: ModelLoader,
    engine: InferenceEngine,
    segmenter: Segmenter,
}

impl ModelPredictor {
    /// Create a predictor; no artifacts are read yet
    pub fn new(config: &PredictorConfig) -> Result<Self> {
        Ok(Self {
            name: "phobert-rating".to_string(),
            loader: ModelLoader::new(config.model.clone(), config.device, config.max_length),
            engine: InferenceEngine::new(),
            segmenter: Segmenter::new()?,
        })
    }

    /// Force the model load now instead of on first prediction
    pub async fn preload(&self) -> Result<()> {
        self.loader.ensure_loaded().await?;
        info!(predictor = %self.name, "model preloaded");
        Ok(())
    }

    /// Whether the underlying handle has been created
    pub fn is_loaded(&self) -> bool {
        self.loader.is_loaded()
    }
}

#[async_trait]
impl Predictor for ModelPredictor {
    async fn predict(&self, text: &str) -> Result<PredictionResult> {
        let handle = self.loader.ensure_loaded().await?;

        let segmented = self.segmenter.segment(text);
        let (rating, confidence) = self.engine.infer(&segmented, &handle)?;

        Ok(PredictionResult::new(text, rating, confidence))
    }

    // One padded forward pass for the whole batch; order is untouched.
    async fn predict_many(&self, texts: &[String]) -> Result<Vec<PredictionResult>> {
        let handle = self.loader.ensure_loaded().await?;

        let segmented: Vec<String> = texts.iter().map(|t| self.segmenter.segment(t)).collect();
        let scored = self.engine.infer_many(&segmented, &handle)?;

        if scored.len() != texts.len() {
            return Err(Error::inference(format!(
                "scored {} items for a batch of {}",
                scored.len(),
                texts.len()
            )));
        }

        Ok(texts
            .iter()
            .zip(scored)
            .map(|(text, (rating, confidence))| PredictionResult::new(text, rating, confidence))
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_rating_bands() {
        let predictor = DummyPredictor::with_seed(7);

        for _ in 0..20 {
            let short = predictor.predict("tệ").await.unwrap();
            assert!((1..=3).contains(&short.rating));

            let medium = predictor
                .predict("sản phẩm này dùng khá ổn đó")
                .await
                .unwrap();
            assert!((3..=4).contains(&medium.rating));

            let long = predictor
                .predict("sản phẩm rất tốt, giao hàng nhanh, đóng gói cẩn thận, sẽ ủng hộ tiếp")
                .await
                .unwrap();
            assert!((4..=5).contains(&long.rating));
        }
    }

    #[tokio::test]
    async fn test_dummy_confidence_range() {
        let predictor = DummyPredictor::with_seed(11);

        for _ in 0..50 {
            let result = predictor.predict("Bình thường").await.unwrap();
            assert!((0.70..=0.99).contains(&result.confidence));
            // Rounded to two decimals
            let scaled = result.confidence * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-4);
        }
    }

    #[tokio::test]
    async fn test_dummy_seeded_is_deterministic() {
        let a = DummyPredictor::with_seed(42);
        let b = DummyPredictor::with_seed(42);

        for text in ["ok", "Sản phẩm rất tốt và đáng tiền", "Bình thường"] {
            let ra = a.predict(text).await.unwrap();
            let rb = b.predict(text).await.unwrap();
            assert_eq!(ra.rating, rb.rating);
            assert_eq!(ra.confidence, rb.confidence);
        }
    }

    #[tokio::test]
    async fn test_dummy_keeps_source_text() {
        let predictor = DummyPredictor::with_seed(1);
        let result = predictor.predict("Tồi, không đáng tiền").await.unwrap();
        assert_eq!(result.source_text, "Tồi, không đáng tiền");
    }

    #[tokio::test]
    async fn test_predictor_from_config_selects_dummy() {
        let config = PredictorConfig {
            mode: PredictorMode::Dummy,
            seed: Some(3),
            ..Default::default()
        };

        let predictor = predictor_from_config(&config).await.unwrap();
        assert_eq!(predictor.name(), "dummy");
    }

    #[tokio::test]
    async fn test_lazy_predictor_defers_load() {
        let config = PredictorConfig::default();
        let predictor = ModelPredictor::new(&config).unwrap();

        // Construction alone must not touch the model artifacts.
        assert!(!predictor.is_loaded());
    }
}
