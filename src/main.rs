//! stamp - structured filenames for notes

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = stamp::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
