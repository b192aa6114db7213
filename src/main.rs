//! dupefind - duplicate file finder
//!
//! Entry point for the dupefind CLI application.

use std::io::{self, BufWriter};

use clap::Parser;
use dupefind::{cli::Cli, error::ExitCode, logging::init_logging, signal};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let cancel = match signal::install_handler() {
        Ok(token) => token,
        Err(e) => {
            log::warn!("Ctrl+C handling unavailable: {}", e);
            signal::CancelToken::new()
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match dupefind::run(&cli, cancel, &mut out) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
