//! Binary entrypoint for the `codebrief` CLI.

use std::process::ExitCode;

use clap::Parser;

use codebrief::cli::Cli;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    codebrief::init_tracing(cli.verbose);

    // Recording and replay are selected in commands::dispatch via
    // CODEBRIEF_RECORD / CODEBRIEF_REPLAY.
    match codebrief::run(&cli) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
