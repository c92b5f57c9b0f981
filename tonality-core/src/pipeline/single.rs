//! Single comment prediction.

use tonality_types::ModelError;
use tracing::{debug, debug_span};

use crate::error::{PredictError, Result};
use crate::model::{Classifier, Vectorizer};
use crate::pipeline::types::{SentimentPipeline, SinglePrediction};

impl<V: Vectorizer, C: Classifier> SentimentPipeline<V, C> {
    /// Predicts the sentiment of one comment.
    ///
    /// # Errors
    ///
    /// [`PredictError::EmptyInput`] for empty or whitespace-only text; the
    /// models are not consulted in that case.
    pub fn predict_single(&self, text: &str) -> Result<SinglePrediction> {
        if text.trim().is_empty() {
            return Err(PredictError::EmptyInput);
        }
        let _span = debug_span!("predict_single", chars = text.chars().count()).entered();

        let cleaned = self.normalizer.normalize(text);
        let label = self
            .classify(&[cleaned.as_str()])?
            .into_iter()
            .next()
            .ok_or(ModelError::LengthMismatch {
                expected: 1,
                found: 0,
            })?;

        debug!(cleaned = %cleaned, label = %label, "predicted single comment");

        Ok(SinglePrediction {
            text: text.to_string(),
            cleaned,
            label,
        })
    }
}
