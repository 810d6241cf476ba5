//! ingestguard binary
//!
//! Runs one command. On failure the error object is already on stdout; the
//! summary goes to stderr and the exit code is 1.

use ingestguard::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
