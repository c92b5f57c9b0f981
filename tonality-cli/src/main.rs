use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tonality_core::{Config, SentimentPipeline};
use tracing::{debug, info};

mod logging;
mod render;
mod session;

use crate::render::OutputFormat;
use crate::session::{request_error, Session};

/// Exit status for a rejected request (empty comment, bad upload).
const REQUEST_FAILED: u8 = 2;

#[derive(Parser)]
#[command(name = "tonality")]
#[command(about = "Predict the sentiment of customer reviews")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "TONALITY_CONFIG")]
    config: Option<PathBuf>,

    /// Classifier artifact, overrides the configured path
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Vectorizer artifact, overrides the configured path
    #[arg(long, global = true)]
    vectorizer: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the sentiment of one comment
    Single {
        /// The comment; the configured sample text when omitted
        text: Option<String>,
    },
    /// Predict every review of a CSV file
    Batch {
        /// CSV file with a header row and a review column
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Pass the other input columns through to the output
        #[arg(long)]
        keep_columns: bool,
    },
    /// Read comments and commands from stdin, one per line
    Interactive,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(cli.config.as_deref()).context("loading configuration")?;
    if let Some(model) = &cli.model {
        config.artifacts.model = model.clone();
    }
    if let Some(vectorizer) = &cli.vectorizer {
        config.artifacts.vectorizer = vectorizer.clone();
    }
    Ok(config)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = load_config(&cli)?;
    debug!(?config, "configuration loaded");

    let pipeline = SentimentPipeline::from_config(&config).with_context(|| {
        format!(
            "loading artifacts {} and {}",
            config.artifacts.vectorizer.display(),
            config.artifacts.model.display()
        )
    })?;
    info!("pipeline ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match cli.command {
        Commands::Single { text } => {
            Session::new(pipeline, config.single.sample_text).single(&mut out, text.as_deref())
        }
        Commands::Batch {
            file,
            format,
            keep_columns,
        } => Session::new(pipeline, config.single.sample_text)
            .with_output(format, keep_columns)
            .batch(&mut out, file.as_deref()),
        Commands::Interactive => {
            let stdin = io::stdin();
            Session::new(pipeline, config.single.sample_text).interactive(stdin.lock(), &mut out)
        }
    };
    out.flush()?;

    exit_status(result).map(ExitCode::from)
}

/// Maps a command outcome to the process exit status.
///
/// A rejected request is reported on stderr and yields [`REQUEST_FAILED`];
/// any other error is passed up to abort the process.
fn exit_status(result: Result<()>) -> Result<u8> {
    match result {
        Ok(()) => Ok(0),
        Err(err) => match request_error(&err) {
            Some(e) => {
                eprintln!("error: {e}");
                Ok(REQUEST_FAILED)
            }
            None => Err(err),
        },
    }
}
