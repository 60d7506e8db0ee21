//! Batch orchestration
//!
//! Applies the predictor across an ordered collection of review texts.
//! Inputs are never reordered, dropped, or deduplicated; the result
//! length always equals the input length.

use crate::predictor::Predictor;
use rateviet_core::{BatchResult, Error, HistoryRecord, PredictionKind, PredictionResult, Result};
use std::sync::Arc;
use tracing::debug;

/// Runs a predictor over ordered batches of comments
pub struct BatchOrchestrator {
    predictor: Arc<dyn Predictor>,
}

impl BatchOrchestrator {
    /// Create an orchestrator around the given predictor
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    /// Predict ratings for every text, in input order.
    ///
    /// An empty collection is rejected with `EmptyBatch` before any
    /// inference work begins: no caller is expected to request zero
    /// predictions.
    pub async fn infer_batch(&self, texts: &[String]) -> Result<BatchResult> {
        if texts.is_empty() {
            return Err(Error::EmptyBatch);
        }

        debug!(
            predictor = self.predictor.name(),
            batch = texts.len(),
            "running batch inference"
        );

        let results = self.predictor.predict_many(texts).await?;
        debug_assert_eq!(results.len(), texts.len());

        Ok(BatchResult(results))
    }
}

/// Build the history row for one prediction, tagged with the
/// prediction-type marker. The core never writes it.
pub fn history_record(
    result: &PredictionResult,
    product_label: Option<&str>,
    kind: PredictionKind,
) -> HistoryRecord {
    HistoryRecord {
        product_label: product_label.map(str::to_string),
        comment: result.source_text.clone(),
        rating: result.rating,
        confidence: result.confidence,
        kind,
    }
}

/// Build history rows for the persistence collaborator, one per result,
/// tagged with the prediction-type marker. The core never writes them.
pub fn history_records(
    results: &BatchResult,
    product_label: Option<&str>,
    kind: PredictionKind,
) -> Vec<HistoryRecord> {
    results
        .iter()
        .map(|r| history_record(r, product_label, kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::DummyPredictor;

    fn orchestrator() -> BatchOrchestrator {
        BatchOrchestrator::new(Arc::new(DummyPredictor::with_seed(5)))
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let err = orchestrator().infer_batch(&[]).await.unwrap_err();
        assert!(matches!(err, Error::EmptyBatch));
    }

    #[tokio::test]
    async fn test_batch_preserves_length_and_order() {
        let texts: Vec<String> = [
            "Sản phẩm rất tốt",
            "Tồi, không đáng tiền",
            "Bình thường",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let batch = orchestrator().infer_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), texts.len());
        for (result, text) in batch.iter().zip(&texts) {
            assert_eq!(&result.source_text, text);
            assert!((1..=5).contains(&result.rating));
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let texts = vec!["ok".to_string(), "ok".to_string(), "ok".to_string()];
        let batch = orchestrator().infer_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_history_records_tagging() {
        let batch = BatchResult(vec![
            PredictionResult::new("tốt", 5, 0.9),
            PredictionResult::new("tệ", 1, 0.8),
        ]);

        let rows = history_records(&batch, Some("Tai nghe X"), PredictionKind::Batch);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_label.as_deref(), Some("Tai nghe X"));
        assert_eq!(rows[0].comment, "tốt");
        assert_eq!(rows[1].rating, 1);
        assert!(rows.iter().all(|r| r.kind == PredictionKind::Batch));
    }
}
