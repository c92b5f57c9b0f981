//! Command execution over a loaded pipeline.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use tonality_core::{PredictError, SentimentPipeline};
use tracing::debug;

use crate::render::{render_batch, render_single, OutputFormat};

const PROMPT: &str = "> ";

const HELP: &str = "\
Type a comment to predict its sentiment.
  :file PATH   predict every review in a CSV file
  :sample      predict the sample comment
  :help        show this message
  :quit        exit";

/// Returns the per-request error behind `err`, if that is what it is.
///
/// Anything else (artifact, I/O, rendering) is fatal to the caller.
pub fn request_error(err: &anyhow::Error) -> Option<&PredictError> {
    err.downcast_ref::<PredictError>()
}

pub struct Session {
    pipeline: SentimentPipeline,
    sample_text: String,
    format: OutputFormat,
    keep_columns: bool,
}

impl Session {
    pub fn new(pipeline: SentimentPipeline, sample_text: impl Into<String>) -> Self {
        Self {
            pipeline,
            sample_text: sample_text.into(),
            format: OutputFormat::Table,
            keep_columns: false,
        }
    }

    pub fn with_output(mut self, format: OutputFormat, keep_columns: bool) -> Self {
        self.format = format;
        self.keep_columns = keep_columns;
        self
    }

    /// Predicts one comment, falling back to the sample text.
    pub fn single<W: Write>(&self, out: &mut W, text: Option<&str>) -> Result<()> {
        let text = text.unwrap_or(&self.sample_text);
        let prediction = self.pipeline.predict_single(text)?;
        render_single(out, &prediction)
    }

    /// Predicts every review of a CSV upload.
    pub fn batch<W: Write>(&self, out: &mut W, file: Option<&Path>) -> Result<()> {
        let upload = self.pipeline.predict_upload(file)?;
        render_batch(
            out,
            &upload,
            &self.pipeline.batch_config().review_column,
            self.format,
            self.keep_columns,
        )
    }

    /// Line-oriented loop until `:quit` or end of input.
    ///
    /// Request errors are printed and the loop goes on.
    pub fn interactive<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{HELP}")?;
        write!(out, "{PROMPT}")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;

            let result = match line.trim() {
                ":quit" | ":q" => break,
                ":help" => writeln!(out, "{HELP}").map_err(anyhow::Error::from),
                ":sample" => self.single(out, None),
                ":file" => self.batch(out, None),
                cmd if cmd.starts_with(":file ") => {
                    let path = cmd[":file".len()..].trim();
                    debug!(path, "batch from interactive session");
                    self.batch(out, Some(Path::new(path)))
                }
                _ => self.single(out, Some(&line)),
            };

            if let Err(err) = result {
                match request_error(&err) {
                    Some(e) => writeln!(out, "error: {e}")?,
                    None => return Err(err),
                }
            }

            write!(out, "{PROMPT}")?;
            out.flush()?;
        }

        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;
    use tonality_core::Config;

    const VECTORIZER: &str = r#"{
        "vocabulary": {"great": 0, "bad": 1, "okay": 2},
        "idf": [1.0, 1.0, 1.0]
    }"#;

    const MODEL: &str = r#"{
        "kind": "linear",
        "classes": [0, 1, 2],
        "coef": [[-1.0, 2.0, 0.0], [0.0, 0.0, 2.0], [2.0, -1.0, 0.0]],
        "intercept": [0.0, 0.1, 0.0]
    }"#;

    fn session(dir: &TempDir) -> Session {
        let mut config = Config::default();
        config.artifacts.vectorizer = dir.path().join("vectorizer.json");
        config.artifacts.model = dir.path().join("model.json");
        fs::write(&config.artifacts.vectorizer, VECTORIZER).unwrap();
        fs::write(&config.artifacts.model, MODEL).unwrap();

        let pipeline = SentimentPipeline::from_config(&config).unwrap();
        Session::new(pipeline, "Great stuff")
    }

    fn run(session: &Session, input: &str) -> String {
        let mut out = Vec::new();
        session.interactive(Cursor::new(input), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn single_uses_sample_by_default() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        session(&dir).single(&mut out, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Your Comment: Great stuff"));
        assert!(text.contains("Predicted Sentiment: Positive"));
    }

    #[test]
    fn single_empty_is_a_request_error() {
        let dir = TempDir::new().unwrap();
        let err = session(&dir).single(&mut Vec::new(), Some(" ")).unwrap_err();
        assert!(matches!(request_error(&err), Some(PredictError::EmptyInput)));
    }

    #[test]
    fn batch_without_file_is_a_request_error() {
        let dir = TempDir::new().unwrap();
        let err = session(&dir).batch(&mut Vec::new(), None).unwrap_err();
        assert!(matches!(request_error(&err), Some(PredictError::MissingFile)));
    }

    #[test]
    fn interactive_comments_and_commands() {
        let dir = TempDir::new().unwrap();
        let s = session(&dir);
        let text = run(&s, "bad bad\n\n:sample\n:quit\nokay\n");

        assert!(text.contains("Predicted Sentiment: Negative"));
        assert!(text.contains("error: Please enter a comment to predict sentiment"));
        assert!(text.contains("Your Comment: Great stuff"));
        assert!(!text.contains("Your Comment: okay"));
    }

    #[test]
    fn interactive_file_command() {
        let dir = TempDir::new().unwrap();
        let s = session(&dir);
        let csv = dir.path().join("reviews.csv");
        fs::write(&csv, "Review\ngreat\nUnknown\nokay\n").unwrap();

        let text = run(&s, &format!(":file {}\n:file\n", csv.display()));
        assert!(text.contains("Customer Review | Sentiment"));
        assert!(text.contains("great           | Positive"));
        assert!(text.contains("okay            | Neutral"));
        assert!(text.contains("error: Please upload a CSV file to proceed"));
    }

    #[test]
    fn interactive_ends_on_eof() {
        let dir = TempDir::new().unwrap();
        let text = run(&session(&dir), "great");
        assert!(text.contains("Predicted Sentiment: Positive"));
    }
}
