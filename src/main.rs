//! `faq-agent` binary.

use std::process::ExitCode;

use clap::Parser;
use faq_agent::cli::{Cli, execute};
use faq_agent::logging::{LogConfig, Logger};

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let log_config = match LogConfig::from_env(cli.verbose) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let (logger, _guard) = match Logger::new(&log_config) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    match execute(&cli, &logger) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output.trim_end());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger.in_scope(|| tracing::error!(error = %e, "command failed"));
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
