//! Command-line interface for the Logo interpreter
//!
//! Provides commands: run, check, repl

mod check_cmd;
mod repl_cmd;
mod run_cmd;

use std::path::{Path, PathBuf};
use std::sync::Once;

use clap::{Parser, Subcommand};
use miette::{GraphicalReportHandler, GraphicalTheme, NamedSource};

use crate::config::Config;
use crate::diagnostics::LogoError;
use crate::parser::SourceFile;

/// Logo - a turtle graphics interpreter
#[derive(Parser, Debug)]
#[command(name = "logo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log interpreter activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ./logo.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a Logo program
    Run {
        /// File to run
        file: PathBuf,

        /// Print the output and the final drawing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse programs without running them
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output diagnostics as JSON
        #[arg(long)]
        json: bool,

        /// Dump the syntax tree as JSON
        #[arg(long)]
        ast: bool,
    },

    /// Start an interactive session
    Repl,
}

impl Cli {
    /// Run the CLI
    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        Cli::parse().execute()
    }

    /// Run an already parsed command line
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        init_tracing(self.verbose);
        let config = Config::discover(self.config.as_deref(), Path::new("."))?;

        match self.command {
            Command::Run { file, json } => {
                run_cmd::run_file(&file, json, &config)?;
            }
            Command::Check { files, json, ast } => {
                check_cmd::run_check(&files, json, ast)?;
            }
            Command::Repl => {
                repl_cmd::run_repl(&config)?;
            }
        }

        Ok(())
    }
}

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber. `RUST_LOG` wins; otherwise `verbose`
/// turns on debug events for this crate. Without either nothing is
/// installed.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new("turtle_logo=debug")
        } else {
            return;
        };
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

fn read_source(path: &Path) -> Result<SourceFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    Ok(SourceFile::new(path.display().to_string(), content))
}

/// Render an error with the source snippet it points at
fn render_error(error: &LogoError, source: &SourceFile) -> String {
    let report = miette::Report::new(error.clone()).with_source_code(NamedSource::new(
        source.name(),
        source.content().to_string(),
    ));
    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, &*report).is_err() {
        return error.report(source).to_human_readable();
    }
    out
}
