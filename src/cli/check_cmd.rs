//! Handler for the `logo check` subcommand.

use std::path::PathBuf;

use crate::parser::{parse_source, SourceFile};

use super::{read_source, render_error};

pub(crate) fn run_check(
    paths: &[PathBuf],
    json: bool,
    ast: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut errors = 0;

    for path in paths {
        let source = read_source(path)?;
        match check_source(&source, json, ast) {
            Ok(out) => println!("{}", out),
            Err(diagnostic) => {
                errors += 1;
                if json {
                    println!("{}", diagnostic);
                } else {
                    eprintln!("{}", diagnostic);
                }
            }
        }
    }

    if errors > 0 {
        return Err(format!("found {} error(s)", errors).into());
    }
    Ok(())
}

/// Parse one source. Ok holds what to print for a clean file, Err the
/// rendered diagnostic.
pub(super) fn check_source(source: &SourceFile, json: bool, ast: bool) -> Result<String, String> {
    match parse_source(source.content()) {
        Ok(program) if ast => serde_json::to_string_pretty(&program).map_err(|e| e.to_string()),
        Ok(program) if json => Ok(serde_json::json!({
            "file": source.name(),
            "ok": true,
            "statements": program.statements.len(),
        })
        .to_string()),
        Ok(program) => Ok(format!(
            "{}: ok ({} statement(s))",
            source.name(),
            program.statements.len()
        )),
        Err(e) if json => Err(e.report(source).to_json()),
        Err(e) => Err(render_error(&e, source)),
    }
}
