//! Logo turtle graphics
//!
//! A tokenizer, parser and tree-walking interpreter for a Logo dialect
//! that drives a turtle drawing on a plane.
//!
//! ```
//! use turtle_logo::turtle::Turtle;
//!
//! let mut turtle = Turtle::new();
//! turtle_logo::interpreter::run(&mut turtle, "REPEAT 4 [FORWARD 100 RIGHT 90]").unwrap();
//! assert_eq!(turtle.drawing()[0].points.len(), 5);
//! ```

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod interpreter;
pub mod parser;
pub mod stack;
pub mod turtle;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::diagnostics::{ErrorKind, LogoError, Span};
    pub use crate::interpreter::{run, Interpreter, Value};
    pub use crate::parser::ast::*;
    pub use crate::turtle::Turtle;
}
