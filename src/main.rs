//! Logo CLI - run, check and explore turtle graphics programs

use std::process::ExitCode;

use turtle_logo::cli::Cli;

fn main() -> ExitCode {
    match Cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
