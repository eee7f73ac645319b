// ~/classic-menu/src/main.rs

use std::process::ExitCode;

use clap::Parser;

use classic_menu::cli::{run_cli, Cli};
use classic_menu::{error, info, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(cli.debug);
    info!("classic-menu starting");

    let ok = match run_cli(cli) {
        Ok(ok) => ok,
        Err(e) => {
            error!("CLI error: {e}");
            eprintln!("classic-menu: {e}");
            false
        }
    };

    info!("classic-menu exiting (success: {ok})");
    logging::flush();

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
