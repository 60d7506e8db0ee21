//! Integration tests for the batch pipeline
//!
//! Uses a configurable mock predictor to exercise orchestration,
//! ordering, and error propagation without model artifacts.

use async_trait::async_trait;
use rateviet_core::{Error, PredictionKind, PredictionResult, Result};
use rateviet_predictor::{history_records, BatchOrchestrator, DummyPredictor, Predictor};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A configurable mock predictor for testing
struct MockPredictor {
    name: String,
    rating: u8,
    confidence: f32,
    call_count: AtomicU32,
}

impl MockPredictor {
    fn new(rating: u8, confidence: f32) -> Self {
        Self {
            name: "mock".to_string(),
            rating,
            confidence,
            call_count: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, text: &str) -> Result<PredictionResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(PredictionResult::new(text, self.rating, self.confidence))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A predictor that always fails, for error-path testing
struct FailingPredictor;

#[async_trait]
impl Predictor for FailingPredictor {
    async fn predict(&self, _text: &str) -> Result<PredictionResult> {
        Err(Error::model_unavailable("weights file not found: test"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_batch_calls_predictor_once_per_item() {
    let mock = Arc::new(MockPredictor::new(4, 0.8));
    let orchestrator = BatchOrchestrator::new(mock.clone());

    let batch = orchestrator
        .infer_batch(&texts(&["a", "b", "c", "d"]))
        .await
        .unwrap();

    assert_eq!(batch.len(), 4);
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test]
async fn test_batch_order_matches_input_order() {
    let orchestrator = BatchOrchestrator::new(Arc::new(MockPredictor::new(3, 0.75)));
    let input = texts(&["thứ nhất", "thứ hai", "thứ ba"]);

    let batch = orchestrator.infer_batch(&input).await.unwrap();

    let sources: Vec<&str> = batch.iter().map(|r| r.source_text.as_str()).collect();
    assert_eq!(sources, vec!["thứ nhất", "thứ hai", "thứ ba"]);
}

#[tokio::test]
async fn test_model_failure_is_all_or_nothing() {
    let orchestrator = BatchOrchestrator::new(Arc::new(FailingPredictor));

    let err = orchestrator
        .infer_batch(&texts(&["a", "b"]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ModelUnavailable(_)));
}

#[tokio::test]
async fn test_empty_batch_never_reaches_predictor() {
    let mock = Arc::new(MockPredictor::new(5, 0.9));
    let orchestrator = BatchOrchestrator::new(mock.clone());

    let err = orchestrator.infer_batch(&[]).await.unwrap_err();

    assert!(matches!(err, Error::EmptyBatch));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_vietnamese_scenario_with_dummy() {
    let orchestrator = BatchOrchestrator::new(Arc::new(DummyPredictor::with_seed(99)));
    let comments = texts(&["Sản phẩm rất tốt", "Tồi, không đáng tiền", "Bình thường"]);

    let batch = orchestrator.infer_batch(&comments).await.unwrap();

    assert_eq!(batch.len(), 3);
    for result in &batch {
        assert!((1..=5).contains(&result.rating));
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    let rows = history_records(&batch, Some("Áo thun"), PredictionKind::Batch);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].comment, "Tồi, không đáng tiền");
}

#[tokio::test]
async fn test_concurrent_batches_share_predictor() {
    let predictor: Arc<dyn Predictor> = Arc::new(DummyPredictor::with_seed(13));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = BatchOrchestrator::new(predictor.clone());
            tokio::spawn(async move {
                let input = texts(&["hài lòng", "thất vọng"]);
                let batch = orchestrator.infer_batch(&input).await.unwrap();
                assert_eq!(batch.len(), 2, "task {i} lost items");
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
}
