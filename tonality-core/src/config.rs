//! Application configuration.
//!
//! Every field has a default, so an empty (or absent) config file yields
//! the stock setup: artifacts in the working directory, a `Review` column
//! and the `"Unknown"` sentinel.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Cell values read as missing, matching the usual dataframe NA markers.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub artifacts: ArtifactPaths,
    pub batch: BatchConfig,
    pub single: SingleConfig,
}

/// Locations of the pre-trained artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub vectorizer: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("sentiment_model.json"),
            vectorizer: PathBuf::from("tfidf_vectorizer.json"),
        }
    }
}

/// Batch (CSV) prediction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Column holding the review text.
    pub review_column: String,
    /// Review value marking an intentionally absent review. Exact match.
    pub sentinel: String,
    /// Cell values treated as missing when reading CSV.
    pub missing_markers: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            review_column: "Review".to_string(),
            sentinel: "Unknown".to_string(),
            missing_markers: DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Single comment settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SingleConfig {
    /// Text used when no comment is given.
    pub sample_text: String,
}

impl Default for SingleConfig {
    fn default() -> Self {
        Self {
            sample_text: "This product is amazing!".to_string(),
        }
    }
}

impl Config {
    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.artifacts.model, PathBuf::from("sentiment_model.json"));
        assert_eq!(config.artifacts.vectorizer, PathBuf::from("tfidf_vectorizer.json"));
        assert_eq!(config.batch.review_column, "Review");
        assert_eq!(config.batch.sentinel, "Unknown");
        assert!(config.batch.missing_markers.iter().any(|m| m == "NaN"));
        assert!(config.batch.missing_markers.iter().any(|m| m.is_empty()));
        assert_eq!(config.single.sample_text, "This product is amazing!");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [artifacts]
            model = "models/nb.json"

            [batch]
            sentinel = "N/A"
            "#,
        )
        .unwrap();
        assert_eq!(config.artifacts.model, PathBuf::from("models/nb.json"));
        assert_eq!(config.artifacts.vectorizer, PathBuf::from("tfidf_vectorizer.json"));
        assert_eq!(config.batch.sentinel, "N/A");
        assert_eq!(config.batch.review_column, "Review");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[single]\nsample_text = \"Terrible.\"").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.single.sample_text, "Terrible.");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch\nsentinel = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn no_path_means_defaults() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config.batch.review_column, "Review");
    }
}
