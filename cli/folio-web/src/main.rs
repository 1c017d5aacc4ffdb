use std::process::ExitCode;

use anyhow::Result;
use bpaf::{Args, ParseFailure};
use commands::{FolioArgs, FolioCli};
use tracing::debug;
use utils::init::init_logger;
use utils::message;

mod commands;
mod config;
mod server;
mod utils;

async fn run(args: FolioArgs) -> Result<()> {
    args.handle().await
}

fn main() -> ExitCode {
    // Pass through Completion "failure"; in completion mode this needs to be
    // printed as is. Stdout failures represent `--help`.
    let args = match commands::folio_cli().run_inner(Args::current_args()) {
        Ok(FolioCli(args)) => args,
        Err(ParseFailure::Stdout(m, _)) => {
            print!("{m:80}");
            return ExitCode::SUCCESS;
        },
        Err(ParseFailure::Completion(c)) => {
            print!("{c}");
            return ExitCode::SUCCESS;
        },
        Err(ParseFailure::Stderr(m)) => {
            message::error(format!("{m:80}"));
            return ExitCode::FAILURE;
        },
    };

    init_logger(args.verbosity);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            message::error(format!("failed to start async runtime: {e}"));
            return ExitCode::FAILURE;
        },
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{:#}", e);

            let err_str = e
                .chain()
                .skip(1)
                .fold(e.to_string(), |acc, cause| format!("{acc}: {cause}"));
            message::error(err_str);

            ExitCode::FAILURE
        },
    }
}
