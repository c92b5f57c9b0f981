//! Review sentiment prediction.
//!
//! Text flows through three stages:
//!
//! - [`analyzer`]: normalization and tokenization of raw review text
//! - [`model`]: the pre-fit TF-IDF vectorizer and pre-trained classifier
//! - [`pipeline`]: single comment and batch (CSV) prediction
//!
//! The models are loaded once from JSON artifacts, validated, and injected
//! into a [`SentimentPipeline`]; nothing mutates them afterwards.
//!
//! ```no_run
//! use tonality_core::{Config, SentimentPipeline};
//!
//! let config = Config::default();
//! let pipeline = SentimentPipeline::from_config(&config)?;
//! let prediction = pipeline.predict_single("This product is amazing!")?;
//! println!("{}", prediction.label);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;

pub use config::Config;
pub use error::{ArtifactError, ConfigError, PredictError};
pub use pipeline::{
    BatchPrediction, PredictedReview, ReviewRecord, ReviewTable, SentimentPipeline,
    SinglePrediction, UploadPrediction,
};
pub use tonality_types::{LabelCode, ModelError, SentimentLabel, LABEL_TABLE};
