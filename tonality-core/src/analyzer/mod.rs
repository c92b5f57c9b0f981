//! Text analysis.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Cleans raw review text into its canonical form
//! - **Tokenizer**: Splits cleaned text into vocabulary terms

pub mod normalizer;
pub mod tokenizer;

pub use normalizer::{normalize, TextNormalizer};
pub use tokenizer::Tokenizer;
