//! Output rendering for predictions.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tonality_core::{SentimentLabel, SinglePrediction, UploadPrediction};

pub const REVIEW_HEADER: &str = "Customer Review";
pub const SENTIMENT_HEADER: &str = "Sentiment";

/// Batch output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table.
    Table,
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array of objects.
    Json,
}

/// Renders a single comment prediction.
pub fn render_single<W: Write>(out: &mut W, prediction: &SinglePrediction) -> Result<()> {
    writeln!(out, "Your Comment: {}", prediction.text)?;
    writeln!(out, "Predicted Sentiment: {}", prediction.label)?;
    Ok(())
}

/// Whether an input column is carried next to the review and its label.
///
/// Columns named like an output header would clash with it and are left out.
fn passes_through(header: &str, review_column: &str) -> bool {
    header != review_column && header != REVIEW_HEADER && header != SENTIMENT_HEADER
}

/// Rectangular view of a batch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl BatchView {
    /// Builds the displayed table.
    ///
    /// Without `keep_columns` only the review and its label are shown.
    /// With it, the input columns are kept in file order with the review
    /// column renamed and the label appended.
    pub fn new(upload: &UploadPrediction, review_column: &str, keep_columns: bool) -> Self {
        let prediction = &upload.prediction;

        if !keep_columns {
            return Self {
                headers: vec![REVIEW_HEADER.to_string(), SENTIMENT_HEADER.to_string()],
                rows: prediction
                    .rows
                    .iter()
                    .map(|r| vec![r.review.clone(), r.label.to_string()])
                    .collect(),
            };
        }

        let columns: Vec<usize> = upload
            .table
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, h)| *h == review_column || passes_through(h, review_column))
            .map(|(i, _)| i)
            .collect();

        let input_headers = upload.table.headers();
        let mut headers: Vec<String> = columns
            .iter()
            .map(|&i| {
                if input_headers[i] == review_column {
                    REVIEW_HEADER.to_string()
                } else {
                    input_headers[i].clone()
                }
            })
            .collect();
        headers.push(SENTIMENT_HEADER.to_string());

        let rows = prediction
            .rows
            .iter()
            .map(|r| {
                let cells = upload.table.row(r.source_row).unwrap_or_default();
                let mut out: Vec<String> = columns
                    .iter()
                    .map(|&i| cells.get(i).cloned().flatten().unwrap_or_default())
                    .collect();
                out.push(r.label.to_string());
                out
            })
            .collect();

        Self { headers, rows }
    }
}

/// Renders a batch result in the requested format.
pub fn render_batch<W: Write>(
    out: &mut W,
    upload: &UploadPrediction,
    review_column: &str,
    format: OutputFormat,
    keep_columns: bool,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let view = BatchView::new(upload, review_column, keep_columns);
            write_table(out, &view)?;
            let p = &upload.prediction;
            writeln!(
                out,
                "\n{} reviews predicted ({} dropped for missing values, {} marked unknown)",
                p.len(),
                p.dropped_missing,
                p.dropped_sentinel
            )?;
        }
        OutputFormat::Csv => {
            let view = BatchView::new(upload, review_column, keep_columns);
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(&view.headers)?;
            for row in &view.rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let rows = json_rows(upload, review_column, keep_columns);
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(rename = "Customer Review")]
    review: &'a str,
    #[serde(rename = "Sentiment")]
    sentiment: SentimentLabel,
    #[serde(flatten)]
    extra: BTreeMap<&'a str, &'a str>,
}

fn json_rows<'a>(
    upload: &'a UploadPrediction,
    review_column: &str,
    keep_columns: bool,
) -> Vec<JsonRow<'a>> {
    let headers = upload.table.headers();
    upload
        .prediction
        .rows
        .iter()
        .map(|r| {
            let mut extra = BTreeMap::new();
            if keep_columns {
                let cells = upload.table.row(r.source_row).unwrap_or_default();
                for (header, cell) in headers.iter().zip(cells) {
                    if passes_through(header, review_column) {
                        extra.insert(header.as_str(), cell.as_deref().unwrap_or_default());
                    }
                }
            }
            JsonRow {
                review: &r.review,
                sentiment: r.label,
                extra,
            }
        })
        .collect()
}

fn write_table<W: Write>(out: &mut W, view: &BatchView) -> std::io::Result<()> {
    let mut widths: Vec<usize> = view.headers.iter().map(|h| h.chars().count()).collect();
    for row in &view.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_row(out, &view.headers, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &view.rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> std::io::Result<()> {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            writeln!(out, "{cell}")?;
        } else {
            let pad = width.saturating_sub(cell.chars().count());
            write!(out, "{cell}{} | ", " ".repeat(pad))?;
        }
    }
    Ok(())
}
