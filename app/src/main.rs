//! FILENAME: app/src/main.rs
// PURPOSE: Command line entry point.
// FORMAT: log lines on stderr are seq|level|category|message

use std::process::ExitCode;

fn main() -> ExitCode {
    match forestplot_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
