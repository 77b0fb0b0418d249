//! learnpath - Learning paths from a local blog catalog

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = learnpath_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
