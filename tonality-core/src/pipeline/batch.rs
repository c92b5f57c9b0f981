//! Batch (tabular) prediction.

use std::path::Path;

use tracing::{debug, debug_span, info};

use crate::error::{PredictError, Result};
use crate::model::{Classifier, Vectorizer};
use crate::pipeline::table::{ReviewRecord, ReviewTable, TableRecord};
use crate::pipeline::types::{
    BatchPrediction, PredictedReview, SentimentPipeline, UploadPrediction,
};

/// A record that survived filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeptReview<'r> {
    /// Index of the record in the input.
    pub source_row: usize,
    pub review: &'r str,
}

/// Outcome of the missing-value and sentinel filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredReviews<'r> {
    /// Surviving records in input order.
    pub kept: Vec<KeptReview<'r>>,
    pub dropped_missing: usize,
    pub dropped_sentinel: usize,
}

/// Drops records with any missing cell, then records whose review is
/// exactly `sentinel`. Survivors keep their relative order.
pub fn filter_reviews<'r, R: ReviewRecord>(records: &'r [R], sentinel: &str) -> FilteredReviews<'r> {
    let mut out = FilteredReviews {
        kept: Vec::with_capacity(records.len()),
        ..FilteredReviews::default()
    };

    for (source_row, record) in records.iter().enumerate() {
        let review = match record.review() {
            Some(review) if !record.has_missing() => review,
            _ => {
                out.dropped_missing += 1;
                continue;
            }
        };
        if review == sentinel {
            out.dropped_sentinel += 1;
            continue;
        }
        out.kept.push(KeptReview { source_row, review });
    }

    out
}

impl<V: Vectorizer, C: Classifier> SentimentPipeline<V, C> {
    /// Predicts every usable row of an uploaded table.
    ///
    /// # Errors
    ///
    /// [`PredictError::MissingColumn`] if the table has no review column;
    /// nothing is predicted in that case.
    pub fn predict_batch(&self, table: &ReviewTable) -> Result<BatchPrediction> {
        let column = table
            .column(&self.batch.review_column)
            .ok_or_else(|| PredictError::MissingColumn {
                column: self.batch.review_column.clone(),
            })?;

        let records: Vec<TableRecord<'_>> = table.records(column).collect();
        self.predict_records(&records)
    }

    /// Filters and predicts arbitrary review records.
    ///
    /// `output.rows[i]` corresponds to the `i`-th surviving record.
    pub fn predict_records<R: ReviewRecord>(&self, records: &[R]) -> Result<BatchPrediction> {
        let _span = debug_span!("predict_batch", rows = records.len()).entered();
        let filtered = filter_reviews(records, &self.batch.sentinel);
        debug!(
            total = records.len(),
            kept = filtered.kept.len(),
            dropped_missing = filtered.dropped_missing,
            dropped_sentinel = filtered.dropped_sentinel,
            "filtered batch"
        );

        let cleaned: Vec<String> = filtered
            .kept
            .iter()
            .map(|kept| self.normalizer.normalize(kept.review))
            .collect();

        let labels = if cleaned.is_empty() {
            Vec::new()
        } else {
            let docs: Vec<&str> = cleaned.iter().map(String::as_str).collect();
            self.classify(&docs)?
        };

        let rows: Vec<PredictedReview> = filtered
            .kept
            .iter()
            .zip(cleaned)
            .zip(labels)
            .map(|((kept, cleaned), label)| PredictedReview {
                source_row: kept.source_row,
                review: kept.review.to_string(),
                cleaned,
                label,
            })
            .collect();

        info!(
            predicted = rows.len(),
            dropped = filtered.dropped_missing + filtered.dropped_sentinel,
            "batch prediction finished"
        );

        Ok(BatchPrediction {
            rows,
            dropped_missing: filtered.dropped_missing,
            dropped_sentinel: filtered.dropped_sentinel,
        })
    }

    /// Reads an uploaded CSV file and predicts it.
    ///
    /// # Errors
    ///
    /// [`PredictError::MissingFile`] when no file was given, plus any read
    /// or [`predict_batch`](Self::predict_batch) error.
    pub fn predict_upload(&self, path: Option<&Path>) -> Result<UploadPrediction> {
        let path = path.ok_or(PredictError::MissingFile)?;
        let table = ReviewTable::from_path(path, &self.batch.missing_markers)?;
        debug!(file = %path.display(), rows = table.len(), "read upload");

        let prediction = self.predict_batch(&table)?;
        Ok(UploadPrediction { table, prediction })
    }
}
