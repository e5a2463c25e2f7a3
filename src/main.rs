//! sessionfile binary entry point.

use std::process::ExitCode;

use sessionfile::cli::{self, Args};
use sessionfile::config::Config;
use sessionfile::{logging, SessionStore};
use tracing::{debug, error};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Try 'sessionfile --help' for more information.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::load(args)?;
    logging::init(Some(config.log_filter().as_str()));

    let Some(command) = args.command.as_ref() else {
        cli::print_help();
        return Ok(ExitCode::from(2));
    };

    debug!(dir = %config.store.directory.display(), "using session directory");
    let mut store = SessionStore::new_in(&config.store.directory);

    let stdout = std::io::stdout();
    cli::run(command, &mut store, &mut stdout.lock())?;
    Ok(ExitCode::SUCCESS)
}
