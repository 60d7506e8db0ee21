//! Inference over preprocessed review text
//!
//! Encodes one or more segmented texts, runs the classifier forward pass,
//! and maps the output distribution to `(rating, confidence)` pairs.

use crate::loader::ModelHandle;
use candle_core::{DType, Tensor, D};
use rateviet_core::{Error, Result};
use tracing::debug;

/// A scored rating prediction: the chosen star and its probability mass
pub type ScoredRating = (u8, f32);

/// Stateless inference engine; all per-process state lives in the handle
#[derive(Debug, Default)]
pub struct InferenceEngine;

impl InferenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Infer a rating for a single preprocessed text
    pub fn infer(&self, preprocessed: &str, handle: &ModelHandle) -> Result<ScoredRating> {
        let mut scored = self.infer_many(&[preprocessed.to_string()], handle)?;
        scored
            .pop()
            .ok_or_else(|| Error::inference("no prediction produced"))
    }

    /// Infer ratings for a batch of preprocessed texts in one forward pass.
    ///
    /// Output order matches input order. Texts are truncated at the token
    /// ceiling and padded to the longest sequence in the batch.
    pub fn infer_many(&self, preprocessed: &[String], handle: &ModelHandle) -> Result<Vec<ScoredRating>> {
        let encodings = handle
            .tokenizer
            .encode_batch(preprocessed.to_vec(), true)
            .map_err(|e| Error::inference(format!("tokenization failed: {e}")))?;

        let batch = encodings.len();
        let seq_len = encodings.first().map(|e| e.get_ids().len()).unwrap_or(0);

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        for encoding in &encodings {
            ids.extend_from_slice(encoding.get_ids());
            mask.extend_from_slice(encoding.get_attention_mask());
        }

        let input_ids = Tensor::from_vec(ids, (batch, seq_len), &handle.device)
            .map_err(|e| Error::inference(format!("failed to build input tensor: {e}")))?;
        let attention_mask = Tensor::from_vec(mask, (batch, seq_len), &handle.device)
            .map_err(|e| Error::inference(format!("failed to build attention mask: {e}")))?;
        // Single-sentence task: all segment ids are zero.
        let token_type_ids = input_ids
            .zeros_like()
            .map_err(|e| Error::inference(format!("failed to build token type ids: {e}")))?;

        let logits = handle
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| Error::inference(format!("forward pass failed: {e}")))?;

        let probs = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|p| p.to_dtype(DType::F32))
            .and_then(|p| p.to_vec2::<f32>())
            .map_err(|e| Error::inference(format!("failed to read probabilities: {e}")))?;

        debug!(batch, seq_len, "scored rating batch");

        probs.into_iter().map(select_rating).collect()
    }
}

/// Map a probability vector over the five classes to `(rating, confidence)`.
///
/// Class index is 0-based; ratings are 1-based. Confidence is the
/// probability at the argmax, never renormalized afterward.
fn select_rating(probs: Vec<f32>) -> Result<ScoredRating> {
    let (index, confidence) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| Error::inference("empty probability vector"))?;

    Ok((index as u8 + 1, confidence))
}
