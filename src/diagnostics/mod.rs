//! Error reporting for Logo programs
//!
//! Every failure while parsing or running a program is a [`LogoError`]:
//! an [`ErrorKind`] with a stable error code, plus the byte range of the
//! offending source when one is known. Errors render through `miette`
//! in the CLI and serialize to JSON [`Report`]s for tooling.

use miette::LabeledSpan;
use serde::Serialize;
use thiserror::Error;

use crate::parser::span::SourceFile;

pub mod error_codes;
pub use error_codes::*;

/// A byte range in the program source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (0-indexed)
    pub start: usize,

    /// End byte offset (0-indexed, exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Merge two spans into one that covers both
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What went wrong
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("expected {expected}, found {found}")]
    Parse { expected: String, found: String },

    #[error("I don't know how to {name}")]
    UnknownCommand { name: String },

    #[error("{name} expects {expected} inputs, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("{operation} expected {expected}, got {found}")]
    TypeMismatch {
        operation: String,
        expected: &'static str,
        found: String,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: f64, len: usize },

    #[error("{operation} of an empty list")]
    EmptyList { operation: String },

    #[error(":{name} has no value")]
    UndefinedVariable { name: String },

    #[error("undefined procedure {name}")]
    UndefinedProcedure { name: String },

    #[error("{message}")]
    Context { message: String },

    #[error("FOR step must not be zero")]
    ForLoopStep,
}

impl ErrorKind {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Parse { .. } => syntax::UNEXPECTED_TOKEN,
            ErrorKind::UnknownCommand { .. } => runtime::UNKNOWN_COMMAND,
            ErrorKind::ArityMismatch { .. } => runtime::ARITY_MISMATCH,
            ErrorKind::TypeMismatch { .. } => runtime::TYPE_MISMATCH,
            ErrorKind::DivisionByZero => runtime::DIVISION_BY_ZERO,
            ErrorKind::IndexOutOfBounds { .. } => runtime::INDEX_OUT_OF_BOUNDS,
            ErrorKind::EmptyList { .. } => runtime::EMPTY_LIST,
            ErrorKind::UndefinedVariable { .. } => runtime::UNDEFINED_VARIABLE,
            ErrorKind::UndefinedProcedure { .. } => runtime::UNDEFINED_PROCEDURE,
            ErrorKind::Context { .. } => runtime::CONTEXT,
            ErrorKind::ForLoopStep => runtime::FOR_LOOP_STEP,
        }
    }

    /// Whether this error was raised before execution started
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ErrorKind::Parse { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            ErrorKind::Parse { .. } => "unexpected token",
            ErrorKind::UnknownCommand { .. } => "unknown command",
            ErrorKind::ArityMismatch { .. } => "wrong number of inputs",
            ErrorKind::TypeMismatch { .. } => "wrong type of input",
            ErrorKind::DivisionByZero => "divided by zero here",
            ErrorKind::IndexOutOfBounds { .. } => "index out of bounds",
            ErrorKind::EmptyList { .. } => "empty list",
            ErrorKind::UndefinedVariable { .. } => "undefined variable",
            ErrorKind::UndefinedProcedure { .. } => "undefined procedure",
            ErrorKind::Context { .. } => "not allowed here",
            ErrorKind::ForLoopStep => "zero step",
        }
    }
}

/// An error raised while parsing or running a program
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct LogoError {
    pub kind: ErrorKind,
    /// Source location where the error occurred
    pub span: Option<Span>,
}

impl LogoError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, span: None }
    }

    /// Attach a source location, replacing any existing one
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach a source location unless a more precise one is already set
    pub fn or_at(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Byte offset of the failing construct, when known
    pub fn offset(&self) -> Option<usize> {
        self.span.map(|span| span.start)
    }

    pub fn parse(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Parse {
            expected: expected.into(),
            found: found.into(),
        })
        .at(span)
    }

    pub fn unknown_command(name: &str) -> Self {
        Self::new(ErrorKind::UnknownCommand {
            name: name.to_string(),
        })
    }

    pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            name: name.to_string(),
            expected,
            got,
        })
    }

    pub fn type_mismatch(operation: &str, expected: &'static str, found: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            operation: operation.to_string(),
            expected,
            found: found.into(),
        })
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero)
    }

    pub fn index_out_of_bounds(index: f64, len: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfBounds { index, len })
    }

    pub fn empty_list(operation: &str) -> Self {
        Self::new(ErrorKind::EmptyList {
            operation: operation.to_string(),
        })
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(ErrorKind::UndefinedVariable {
            name: name.to_string(),
        })
    }

    pub fn undefined_procedure(name: &str) -> Self {
        Self::new(ErrorKind::UndefinedProcedure {
            name: name.to_string(),
        })
    }

    pub fn context(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Context {
            message: message.into(),
        })
    }

    pub fn for_loop_step() -> Self {
        Self::new(ErrorKind::ForLoopStep)
    }

    /// Build a machine-readable report, resolving the span to line/column
    pub fn report(&self, source: &SourceFile) -> Report {
        let (line, column) = match self.span {
            Some(span) => {
                let (line, column) = source.line_col(span.start);
                (Some(line), Some(column))
            }
            None => (None, None),
        };
        Report {
            code: self.code(),
            message: self.to_string(),
            file: source.name().to_string(),
            span: self.span,
            line,
            column,
        }
    }
}

impl From<ErrorKind> for LogoError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl miette::Diagnostic for LogoError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(self.kind.label().to_string()),
            span.start,
            span.len(),
        ))))
    }
}

/// A serializable error report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Stable error code (e.g., "E4003")
    pub code: &'static str,

    /// Human-readable message
    pub message: String,

    /// Source name
    pub file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,

    /// Start line (1-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Start column (1-indexed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Report {
    /// Format as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format as a one-line human-readable string
    pub fn to_human_readable(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(column)) => format!(
                "error[{}]: {}\n  --> {}:{}:{}",
                self.code, self.message, self.file, line, column
            ),
            _ => format!("error[{}]: {}\n  --> {}", self.code, self.message, self.file),
        }
    }
}

#[cfg(test)]
mod tests;
