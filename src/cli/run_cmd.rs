//! Handler for the `logo run` subcommand.

use std::path::Path;

use serde::Serialize;

use crate::config::Config;
use crate::diagnostics::Report;
use crate::interpreter::value::format_number;
use crate::interpreter::MockConsole;
use crate::parser::SourceFile;
use crate::turtle::{Path as TurtlePath, Turtle, TurtleSnapshot};

use super::{read_source, render_error};

/// Everything `logo run --json` prints
#[derive(Debug, Serialize)]
pub(super) struct RunOutput {
    /// PRINTed values, one per line
    pub(super) printed: Vec<String>,
    pub(super) turtle: TurtleSnapshot,
    pub(super) paths: Vec<TurtlePath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) error: Option<Report>,
}

pub(crate) fn run_file(
    file: &Path,
    json: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_source(file)?;

    if json {
        let output = run_json(&source, config);
        println!("{}", serde_json::to_string_pretty(&output)?);
        if output.error.is_some() {
            return Err(format!("{} failed", source.name()).into());
        }
        return Ok(());
    }

    let mut interpreter = config.interpreter();
    let result = interpreter.run(source.content());
    println!("{}", summary(&interpreter.turtle));
    if let Err(e) = result {
        eprintln!("{}", render_error(&e, &source));
        return Err(format!("{} failed", source.name()).into());
    }
    Ok(())
}

/// Run a program with PRINT output captured
pub(super) fn run_json(source: &SourceFile, config: &Config) -> RunOutput {
    let console = MockConsole::new();
    let mut interpreter = config.interpreter().with_console(console.clone());
    let error = interpreter
        .run(source.content())
        .err()
        .map(|e| e.report(source));

    RunOutput {
        printed: console.output(),
        turtle: interpreter.turtle.snapshot(),
        paths: interpreter.turtle.drawing(),
        error,
    }
}

/// One-line description of the final drawing and pose
pub(super) fn summary(turtle: &Turtle) -> String {
    let snapshot = turtle.snapshot();
    format!(
        "{} path(s), {} segment(s); turtle at [{} {}] heading {}, pen {}",
        turtle.drawing().len(),
        turtle.segments().len(),
        format_number(snapshot.x),
        format_number(snapshot.y),
        format_number(snapshot.heading),
        if snapshot.pen_down { "down" } else { "up" },
    )
}
