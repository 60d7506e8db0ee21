//! Star-rating classification head over a BERT encoder
//!
//! PhoBERT-style checkpoints ship a BERT encoder plus a sequence
//! classification head: tanh pooler over the first token, then a linear
//! projection to the five rating classes.

use candle_core::Tensor;
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};

/// Number of output classes: star ratings 1 through 5
pub const NUM_RATINGS: usize = 5;

/// BERT encoder with a five-way sequence classification head
pub struct RatingClassifier {
    encoder: BertModel,
    pooler: Linear,
    classifier: Linear,
}

impl RatingClassifier {
    /// Instantiate the architecture from loaded weights
    pub fn load(vb: VarBuilder, config: &BertConfig) -> candle_core::Result<Self> {
        let encoder = BertModel::load(vb.pp("bert"), config)?;
        let pooler = linear(
            config.hidden_size,
            config.hidden_size,
            vb.pp("bert.pooler.dense"),
        )?;
        let classifier = linear(config.hidden_size, NUM_RATINGS, vb.pp("classifier"))?;

        Ok(Self {
            encoder,
            pooler,
            classifier,
        })
    }

    /// Forward pass producing rating logits of shape `(batch, 5)`.
    ///
    /// Inference only; no gradients are tracked.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> candle_core::Result<Tensor> {
        let hidden = self
            .encoder
            .forward(input_ids, token_type_ids, attention_mask)?;

        // Pool the first-token hidden state, the classification convention
        // for BERT-family encoders.
        let first_token = hidden.narrow(1, 0, 1)?.squeeze(1)?;
        let pooled = self.pooler.forward(&first_token)?.tanh()?;

        self.classifier.forward(&pooled)
    }
}
