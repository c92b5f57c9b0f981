//! Error types for artifact loading, configuration and prediction.

use std::path::PathBuf;

use thiserror::Error;
use tonality_types::ModelError;

/// Failure to load or validate the vectorizer or classifier.
///
/// Fatal: the process cannot serve predictions without both artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read {kind} artifact '{}': {source}", path.display())]
    Io {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deserialize {kind} artifact '{}': {source}", path.display())]
    Json {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {kind} artifact: {reason}")]
    Invalid { kind: &'static str, reason: String },

    #[error("classifier expects {classifier} features but vectorizer produces {vectorizer}")]
    FeatureMismatch { vectorizer: usize, classifier: usize },
}

impl ArtifactError {
    pub(crate) fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            kind,
            reason: reason.into(),
        }
    }
}

/// Failure to read the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Per-request prediction failure.
///
/// These are shown to the user and never abort the process.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Please enter a comment to predict sentiment")]
    EmptyInput,

    #[error("Please upload a CSV file to proceed")]
    MissingFile,

    #[error("The CSV file must contain a '{column}' column")]
    MissingColumn { column: String },

    #[error("failed to read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV line {line} has {found} fields but the header has {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T, E = PredictError> = std::result::Result<T, E>;
