//! Pipeline state and prediction results.

use serde::Serialize;
use tonality_types::{ModelError, SentimentLabel};

use crate::analyzer::TextNormalizer;
use crate::config::{BatchConfig, Config};
use crate::error::{ArtifactError, PredictError, Result};
use crate::model::{Artifacts, Classifier, ClassifierModel, TfidfVectorizer, Vectorizer};
use crate::pipeline::table::ReviewTable;

/// Sentiment prediction over an injected vectorizer and classifier.
///
/// Both collaborators are owned and never mutated after construction, so
/// one pipeline serves any number of requests.
pub struct SentimentPipeline<V = TfidfVectorizer, C = ClassifierModel> {
    pub(crate) normalizer: TextNormalizer,
    pub(crate) vectorizer: V,
    pub(crate) classifier: C,
    pub(crate) batch: BatchConfig,
}

/// Result of a single comment prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinglePrediction {
    /// The comment as entered.
    pub text: String,
    /// The normalized text fed to the vectorizer.
    pub cleaned: String,
    pub label: SentimentLabel,
}

/// One surviving row of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictedReview {
    /// Index of the row in the input, before filtering.
    pub source_row: usize,
    /// The original review text.
    pub review: String,
    pub cleaned: String,
    pub label: SentimentLabel,
}

/// Batch prediction output, in surviving-row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchPrediction {
    pub rows: Vec<PredictedReview>,
    /// Rows dropped because a cell was missing.
    pub dropped_missing: usize,
    /// Rows dropped because the review was the sentinel value.
    pub dropped_sentinel: usize,
}

impl BatchPrediction {
    /// Number of predicted rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when no row survived filtering.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A parsed upload together with its predictions.
#[derive(Debug, Clone)]
pub struct UploadPrediction {
    pub table: ReviewTable,
    pub prediction: BatchPrediction,
}

impl<V: Vectorizer, C: Classifier> SentimentPipeline<V, C> {
    /// Creates a pipeline with default batch settings.
    pub fn new(vectorizer: V, classifier: C) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            vectorizer,
            classifier,
            batch: BatchConfig::default(),
        }
    }

    /// Replaces the batch settings.
    pub fn with_batch_config(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// Current batch settings.
    pub fn batch_config(&self) -> &BatchConfig {
        &self.batch
    }

    pub fn vectorizer(&self) -> &V {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Vectorizes cleaned documents and maps the predicted codes to labels.
    pub(crate) fn classify(&self, cleaned: &[&str]) -> Result<Vec<SentimentLabel>> {
        let features = self.vectorizer.transform(cleaned);
        let codes = self.classifier.predict(&features)?;

        if codes.len() != cleaned.len() {
            return Err(ModelError::LengthMismatch {
                expected: cleaned.len(),
                found: codes.len(),
            }
            .into());
        }

        codes
            .into_iter()
            .map(|code| SentimentLabel::try_from(code).map_err(PredictError::from))
            .collect()
    }
}

impl SentimentPipeline {
    /// Builds a pipeline from loaded artifacts.
    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self::new(artifacts.vectorizer, artifacts.classifier)
    }

    /// Loads the configured artifacts and applies the batch settings.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ArtifactError> {
        let artifacts = Artifacts::load(&config.artifacts)?;
        Ok(Self::from_artifacts(artifacts).with_batch_config(config.batch.clone()))
    }
}
