//! Loading the pre-trained artifacts.
//!
//! Both artifacts are read eagerly at startup, validated on their own and
//! against each other, then handed to the pipeline as immutable state.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::ArtifactPaths;
use crate::error::ArtifactError;
use crate::model::classifier::{Classifier, ClassifierModel};
use crate::model::vectorizer::{TfidfVectorizer, Vectorizer};

/// The vectorizer and classifier pair, validated and ready to use.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub vectorizer: TfidfVectorizer,
    pub classifier: ClassifierModel,
}

fn read_json<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Json {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and validates a vectorizer artifact.
pub fn load_vectorizer(path: &Path) -> Result<TfidfVectorizer, ArtifactError> {
    let vectorizer: TfidfVectorizer = read_json("vectorizer", path)?;
    vectorizer.validate()?;
    Ok(vectorizer)
}

/// Reads and validates a classifier artifact.
pub fn load_classifier(path: &Path) -> Result<ClassifierModel, ArtifactError> {
    let classifier: ClassifierModel = read_json("classifier", path)?;
    classifier.validate()?;
    Ok(classifier)
}

impl Artifacts {
    /// Pairs an already-built vectorizer and classifier after validating both.
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: ClassifierModel,
    ) -> Result<Self, ArtifactError> {
        vectorizer.validate()?;
        classifier.validate()?;

        if vectorizer.n_features() != classifier.n_features() {
            return Err(ArtifactError::FeatureMismatch {
                vectorizer: vectorizer.n_features(),
                classifier: classifier.n_features(),
            });
        }

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Loads both artifacts from disk.
    ///
    /// # Errors
    ///
    /// Any read, parse or validation failure. Callers treat it as fatal.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let vectorizer = load_vectorizer(&paths.vectorizer)?;
        let classifier = load_classifier(&paths.model)?;
        let artifacts = Self::new(vectorizer, classifier)?;

        info!(
            vectorizer = %paths.vectorizer.display(),
            model = %paths.model.display(),
            features = artifacts.vectorizer.n_features(),
            kind = artifacts.classifier.kind(),
            "loaded sentiment artifacts"
        );

        Ok(artifacts)
    }
}
