//! Handler for the `logo repl` subcommand.

use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::interpreter::Interpreter;
use crate::parser::{tokenize, SourceFile, TokenKind};

use super::render_error;
use super::run_cmd::summary;

const HELP: &str = "\
Commands:
  :quit, :q    Exit the REPL
  :help, :h    Show this help
  :reset       Forget all variables and procedures
  :clear       Clear the drawing and send the turtle home
  :turtle      Show the turtle's position and drawing

Enter Logo statements. A TO definition or an open [ continues on the
next lines until it is closed. A line ending in an expression shows
its value.";

pub(crate) fn run_repl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Logo REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Use :quit to exit, :help for help.");
    println!();

    let mut interpreter = config.interpreter();
    let stdin = io::stdin();
    repl_loop(&mut interpreter, stdin.lock(), &mut io::stdout())?;

    println!("Bye!");
    Ok(())
}

/// Read lines from `input` until EOF or `:quit`, running each complete
/// entry in `interpreter`
pub(super) fn repl_loop(
    interpreter: &mut Interpreter,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut lines = input.lines();
    let mut pending = String::new();

    loop {
        write!(out, "{}", if pending.is_empty() { "? " } else { "> " })?;
        out.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let trimmed = line.trim();

        if pending.is_empty() {
            match trimmed {
                "" => continue,
                ":quit" | ":q" => break,
                ":help" | ":h" => {
                    writeln!(out, "{}", HELP)?;
                    continue;
                }
                ":reset" => {
                    interpreter.reset();
                    writeln!(out, "Forgot all variables and procedures.")?;
                    continue;
                }
                ":clear" => {
                    interpreter.turtle.clear();
                    writeln!(out, "Cleared.")?;
                    continue;
                }
                ":turtle" => {
                    writeln!(out, "{}", summary(&interpreter.turtle))?;
                    continue;
                }
                _ => {}
            }
        }

        pending.push_str(trimmed);
        pending.push('\n');
        if is_incomplete(&pending) {
            continue;
        }

        let entry = std::mem::take(&mut pending);
        match interpreter.eval_line(&entry) {
            Ok(Some(value)) => writeln!(out, "{}", value)?,
            Ok(None) => {}
            Err(e) => {
                let source = SourceFile::new("<repl>", entry);
                writeln!(out, "{}", render_error(&e, &source))?;
            }
        }
    }

    Ok(())
}

/// Whether `source` has a `TO` without its `END` or an unclosed `[`
pub(super) fn is_incomplete(source: &str) -> bool {
    let mut definitions = 0i32;
    let mut brackets = 0i32;
    for token in tokenize(source) {
        match &token.kind {
            TokenKind::LBracket => brackets += 1,
            TokenKind::RBracket => brackets -= 1,
            _ if token.is_word("TO") => definitions += 1,
            _ if token.is_word("END") => definitions -= 1,
            _ => {}
        }
    }
    definitions > 0 || brackets > 0
}
