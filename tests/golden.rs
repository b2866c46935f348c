//! Golden file tests for program output stability
//!
//! Every `tests/programs/*.logo` program is run with a captured console.
//! Its PRINT output, the final turtle state and any error are compared
//! with the sibling `.out` file.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use turtle_logo::interpreter::value::format_number;
use turtle_logo::interpreter::{Interpreter, MockConsole};
use turtle_logo::parser::SourceFile;

/// Round away floating point noise from trigonometry
fn number(n: f64) -> String {
    format_number((n * 1e6).round() / 1e6)
}

fn render(source: &str) -> String {
    let console = MockConsole::new();
    let mut interpreter = Interpreter::new()
        .with_console(console.clone())
        .with_seed(42);
    let result = interpreter.run(source);

    let mut out = String::new();
    for line in console.output() {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("---\n");

    let turtle = &interpreter.turtle;
    writeln!(
        out,
        "pos [{} {}] heading {} pen {}",
        number(turtle.x()),
        number(turtle.y()),
        number(turtle.heading()),
        if turtle.is_pen_down() { "down" } else { "up" }
    )
    .unwrap();
    writeln!(
        out,
        "paths {} segments {}",
        turtle.drawing().len(),
        turtle.segments().len()
    )
    .unwrap();

    if let Err(e) = result {
        let file = SourceFile::new("program", source);
        let location = match e.span {
            Some(span) => {
                let (line, column) = file.line_col(span.start);
                format!(" at {}:{}", line, column)
            }
            None => String::new(),
        };
        writeln!(out, "error {}{}: {}", e.code(), location, e).unwrap();
    }
    out
}

fn run_single_golden_test(path: &Path) {
    let source = fs::read_to_string(path).unwrap();
    let expected_path = path.with_extension("out");
    let actual = render(&source);

    let Ok(expected) = fs::read_to_string(&expected_path) else {
        panic!(
            "missing {}; the program produced:\n{}",
            expected_path.display(),
            actual
        );
    };
    assert_eq!(actual, expected, "output of {}", path.display());
}

#[test]
fn golden_program_tests() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("programs");

    let mut programs: Vec<_> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "logo"))
        .collect();
    programs.sort();
    assert!(!programs.is_empty(), "no programs in {}", dir.display());

    for path in &programs {
        run_single_golden_test(path);
    }
}
