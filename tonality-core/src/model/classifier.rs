//! Pre-trained sentiment classifiers.
//!
//! Two model families are understood, selected by the `kind` tag of the
//! JSON artifact:
//!
//! - `linear`: one weight row per class (or a single row for two classes)
//!   plus intercepts. Covers logistic regression and linear SVMs.
//! - `multinomial_nb`: class log priors and per-class feature log
//!   probabilities.
//!
//! Both predict the class with the highest score; ties go to the class
//! listed first.

use crate::error::ArtifactError;
use crate::model::features::FeatureVector;

use serde::{Deserialize, Serialize};
use tonality_types::{LabelCode, ModelError, SentimentLabel};

/// Capability of mapping feature vectors to class codes.
pub trait Classifier {
    /// Dimensionality the model was trained with.
    fn n_features(&self) -> usize;

    /// Predicts one class code per vector, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DimensionMismatch`] if any vector's dimension
    /// differs from [`Classifier::n_features`].
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<LabelCode>, ModelError>;
}

fn check_dims(expected: usize, features: &[FeatureVector]) -> Result<(), ModelError> {
    match features.iter().find(|f| f.dim() != expected) {
        Some(bad) => Err(ModelError::DimensionMismatch {
            expected,
            found: bad.dim(),
        }),
        None => Ok(()),
    }
}

/// Class code for score row `idx`.
///
/// Models built without validation may list fewer classes than score rows.
fn class_at(classes: &[LabelCode], idx: usize) -> Result<LabelCode, ModelError> {
    classes.get(idx).copied().ok_or(ModelError::MissingClass {
        index: idx,
        classes: classes.len(),
    })
}

/// Index of the first maximum, numpy `argmax` style.
fn argmax(scores: impl IntoIterator<Item = f64>) -> usize {
    let mut best = 0usize;
    let mut best_score = f64::NEG_INFINITY;
    for (i, s) in scores.into_iter().enumerate() {
        if s > best_score {
            best = i;
            best_score = s;
        }
    }
    best
}

fn validate_classes(classes: &[LabelCode]) -> Result<(), ArtifactError> {
    if classes.len() < 2 {
        return Err(ArtifactError::invalid(
            "classifier",
            format!("expected at least 2 classes, found {}", classes.len()),
        ));
    }
    for (i, &code) in classes.iter().enumerate() {
        if SentimentLabel::from_code(code).is_none() {
            return Err(ArtifactError::invalid(
                "classifier",
                format!("class code {code} has no sentiment label"),
            ));
        }
        if classes[..i].contains(&code) {
            return Err(ArtifactError::invalid(
                "classifier",
                format!("class code {code} listed twice"),
            ));
        }
    }
    Ok(())
}

fn validate_matrix(name: &str, rows: &[Vec<f64>], width: usize) -> Result<(), ArtifactError> {
    for (r, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(ArtifactError::invalid(
                "classifier",
                format!("{name} row {r} has {} columns, expected {width}", row.len()),
            ));
        }
        if row.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::invalid(
                "classifier",
                format!("{name} row {r} contains a non-finite weight"),
            ));
        }
    }
    Ok(())
}

/// Linear model: `argmax(coef · x + intercept)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    classes: Vec<LabelCode>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearClassifier {
    /// Creates a linear model.
    ///
    /// `coef` has one row per class, or a single row when there are
    /// exactly two classes (positive score selects `classes[1]`).
    pub fn new(classes: Vec<LabelCode>, coef: Vec<Vec<f64>>, intercept: Vec<f64>) -> Self {
        Self {
            classes,
            coef,
            intercept,
        }
    }

    /// Class codes in score order.
    pub fn classes(&self) -> &[LabelCode] {
        &self.classes
    }

    /// Checks shapes and class codes.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        validate_classes(&self.classes)?;

        let rows = self.coef.len();
        let binary = rows == 1 && self.classes.len() == 2;
        if rows != self.classes.len() && !binary {
            return Err(ArtifactError::invalid(
                "classifier",
                format!(
                    "coef has {rows} rows for {} classes",
                    self.classes.len()
                ),
            ));
        }
        if self.intercept.len() != rows {
            return Err(ArtifactError::invalid(
                "classifier",
                format!("intercept has {} values for {rows} rows", self.intercept.len()),
            ));
        }
        if self.intercept.iter().any(|b| !b.is_finite()) {
            return Err(ArtifactError::invalid(
                "classifier",
                "intercept contains a non-finite value",
            ));
        }
        validate_matrix("coef", &self.coef, self.n_features())
    }

    /// Raw decision scores, one per coefficient row.
    pub fn decision_function(&self, x: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row) + b)
            .collect()
    }

    fn predict_one(&self, x: &FeatureVector) -> Result<LabelCode, ModelError> {
        let scores = self.decision_function(x);
        if scores.len() == 1 {
            return class_at(&self.classes, usize::from(scores[0] > 0.0));
        }
        class_at(&self.classes, argmax(scores))
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.coef.first().map_or(0, Vec::len)
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<LabelCode>, ModelError> {
        check_dims(self.n_features(), features)?;
        features.iter().map(|x| self.predict_one(x)).collect()
    }
}

/// Multinomial naive Bayes: `argmax(log P(c) + x · log P(w|c))`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    classes: Vec<LabelCode>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    /// Creates a naive Bayes model from log priors and log likelihoods.
    pub fn new(
        classes: Vec<LabelCode>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            classes,
            class_log_prior,
            feature_log_prob,
        }
    }

    /// Checks shapes and class codes.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        validate_classes(&self.classes)?;

        let k = self.classes.len();
        if self.class_log_prior.len() != k || self.feature_log_prob.len() != k {
            return Err(ArtifactError::invalid(
                "classifier",
                format!(
                    "{k} classes but {} priors and {} likelihood rows",
                    self.class_log_prior.len(),
                    self.feature_log_prob.len()
                ),
            ));
        }
        if self.class_log_prior.iter().any(|p| !p.is_finite()) {
            return Err(ArtifactError::invalid(
                "classifier",
                "class_log_prior contains a non-finite value",
            ));
        }
        validate_matrix("feature_log_prob", &self.feature_log_prob, self.n_features())
    }

    /// Joint log likelihood per class.
    pub fn joint_log_likelihood(&self, x: &FeatureVector) -> Vec<f64> {
        self.feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(row, prior)| prior + x.dot(row))
            .collect()
    }
}

impl Classifier for MultinomialNb {
    fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<LabelCode>, ModelError> {
        check_dims(self.n_features(), features)?;
        features
            .iter()
            .map(|x| class_at(&self.classes, argmax(self.joint_log_likelihood(x))))
            .collect()
    }
}

/// A loaded classifier artifact of any supported kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    /// Linear decision function.
    Linear(LinearClassifier),
    /// Multinomial naive Bayes.
    MultinomialNb(MultinomialNb),
}

impl ClassifierModel {
    /// Checks the internal consistency of the model.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            ClassifierModel::Linear(m) => m.validate(),
            ClassifierModel::MultinomialNb(m) => m.validate(),
        }
    }

    /// Short name of the model family, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierModel::Linear(_) => "linear",
            ClassifierModel::MultinomialNb(_) => "multinomial_nb",
        }
    }
}

impl Classifier for ClassifierModel {
    fn n_features(&self) -> usize {
        match self {
            ClassifierModel::Linear(m) => m.n_features(),
            ClassifierModel::MultinomialNb(m) => m.n_features(),
        }
    }

    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<LabelCode>, ModelError> {
        match self {
            ClassifierModel::Linear(m) => m.predict(features),
            ClassifierModel::MultinomialNb(m) => m.predict(features),
        }
    }
}
