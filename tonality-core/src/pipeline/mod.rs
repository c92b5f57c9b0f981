//! Sentiment prediction pipeline.
//!
//! Raw text goes through the normalizer, the vectorizer and the
//! classifier; the resulting codes are mapped to labels through the fixed
//! table in `tonality_types`. Two entry points exist:
//!
//! - **single**: one comment, rejected when empty
//! - **batch**: a review table, filtered for missing values and the
//!   sentinel before prediction
//!
//! Threading: the pipeline only reads its collaborators, so `&self`
//! methods are all it needs. It does no synchronization of its own.

mod batch;
mod single;
mod table;
mod types;

pub use batch::{filter_reviews, FilteredReviews, KeptReview};
pub use table::{ReviewRecord, ReviewTable, TableRecord};
pub use types::{BatchPrediction, PredictedReview, SentimentPipeline, SinglePrediction, UploadPrediction};
