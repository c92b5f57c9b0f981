//! Core types shared across the Tonality workspace.
//!
//! This crate holds the values that cross crate boundaries:
//!
//! - **Labels**: the closed [`SentimentLabel`] enumeration and the fixed
//!   code table the trained classifier agrees with
//! - **Model errors**: failures raised while feeding vectors to a model
//!
//! Keeping them here lets the core pipeline and the command line front
//! end agree on label names without depending on each other.

#![warn(missing_docs)]

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer class code emitted by a classifier.
pub type LabelCode = u32;

/// Predicted sentiment of a review.
///
/// `#[repr(u8)]` keeps the discriminants equal to the classifier codes,
/// so `label as u8` and [`SentimentLabel::code`] always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum SentimentLabel {
    /// Code `0`.
    Negative = 0,
    /// Code `1`.
    Neutral = 1,
    /// Code `2`.
    Positive = 2,
}

/// Code to label table shared with the trained classifier.
///
/// The classifier only ever sees integers; this table is the one place
/// where those integers get a meaning.
pub const LABEL_TABLE: [(LabelCode, SentimentLabel); 3] = [
    (0, SentimentLabel::Negative),
    (1, SentimentLabel::Neutral),
    (2, SentimentLabel::Positive),
];

impl SentimentLabel {
    /// All labels in code order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
    ];

    /// Looks up the label for a classifier code.
    ///
    /// Returns `None` for codes outside [`LABEL_TABLE`].
    #[inline]
    pub fn from_code(code: LabelCode) -> Option<Self> {
        LABEL_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|&(_, label)| label)
    }

    /// Returns the classifier code for this label.
    #[inline(always)]
    pub const fn code(self) -> LabelCode {
        self as LabelCode
    }

    /// Human-readable name, as displayed to users.
    #[inline(always)]
    pub const fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Positive => "Positive",
        }
    }
}

impl TryFrom<LabelCode> for SentimentLabel {
    type Error = ModelError;

    fn try_from(code: LabelCode) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ModelError::UnknownClass { code })
    }
}

impl From<SentimentLabel> for LabelCode {
    #[inline(always)]
    fn from(label: SentimentLabel) -> Self {
        label.code()
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a model is applied to feature vectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A feature vector does not have the dimensionality the model was fit on.
    #[error("feature dimension mismatch: model expects {expected}, vector has {found}")]
    DimensionMismatch {
        /// Dimensionality the model was trained with.
        expected: usize,
        /// Dimensionality of the offending vector.
        found: usize,
    },
    /// The classifier produced a code with no entry in [`LABEL_TABLE`].
    #[error("classifier produced unknown class code {code}")]
    UnknownClass {
        /// The unmapped code.
        code: LabelCode,
    },
    /// A score row has no class code, so the model lists too few classes.
    #[error("model has no class for score row {index} ({classes} classes listed)")]
    MissingClass {
        /// The score row picked by the decision rule.
        index: usize,
        /// Number of classes the model lists.
        classes: usize,
    },
    /// A model returned a different number of outputs than it received inputs.
    #[error("model returned {found} outputs for {expected} inputs")]
    LengthMismatch {
        /// Number of inputs.
        expected: usize,
        /// Number of outputs.
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_fixed_labels() {
        assert_eq!(SentimentLabel::from_code(0), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::from_code(1), Some(SentimentLabel::Neutral));
        assert_eq!(SentimentLabel::from_code(2), Some(SentimentLabel::Positive));
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(SentimentLabel::from_code(3), None);
        assert_eq!(
            SentimentLabel::try_from(7),
            Err(ModelError::UnknownClass { code: 7 })
        );
    }

    #[test]
    fn table_agrees_with_discriminants() {
        for (code, label) in LABEL_TABLE {
            assert_eq!(label.code(), code);
            assert_eq!(label as u8 as LabelCode, code);
        }
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = SentimentLabel::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(names, ["Negative", "Neutral", "Positive"]);
    }

    #[test]
    fn labels_serialize_by_name() {
        let json = serde_json::to_string(&SentimentLabel::Neutral).unwrap();
        assert_eq!(json, "\"Neutral\"");
    }

    #[test]
    fn error_messages() {
        let err = ModelError::DimensionMismatch {
            expected: 10,
            found: 4,
        };
        assert_eq!(
            err.to_string(),
            "feature dimension mismatch: model expects 10, vector has 4"
        );
    }
}
