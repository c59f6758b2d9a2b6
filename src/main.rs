//! dupfind - duplicate file finder
//!
//! Entry point for the dupfind CLI application.

use clap::Parser;
use dupfind::{
    cli::Cli,
    error::{ExitCode, StructuredError},
    logging::init_logging,
};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    init_logging(cli.verbose, cli.quiet);

    match dupfind::run_app(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);

            if json_errors {
                eprintln!("{}", StructuredError::new(&err, exit_code).to_json());
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            exit_code.into()
        }
    }
}
