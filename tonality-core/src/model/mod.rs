//! Pre-trained model artifacts and their capabilities.
//!
//! - **Features**: sparse vectors passed from vectorizer to classifier
//! - **Vectorizer**: TF-IDF transform fit offline
//! - **Classifier**: linear and naive Bayes models trained offline
//! - **Artifacts**: JSON loading and cross-validation of the pair

pub mod artifacts;
pub mod classifier;
pub mod features;
pub mod vectorizer;

pub use artifacts::Artifacts;
pub use classifier::{Classifier, ClassifierModel, LinearClassifier, MultinomialNb};
pub use features::FeatureVector;
pub use vectorizer::{Norm, TfidfVectorizer, Vectorizer};
