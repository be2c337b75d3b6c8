//! # tripsplit
//!
//! ```bash
//! tripsplit demos/lisbon.json --pretty
//! tripsplit --trip porto trips.json
//! ```

use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use tripsplit_cli::{parse_args, run, Command, EXIT_INTERNAL, EXIT_REJECTED, USAGE};

fn main() -> ExitCode {
    init_tracing();

    let command = match parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {}", err);
            eprintln!();
            eprintln!("{}", USAGE);
            return exit(EXIT_REJECTED);
        }
    };

    match command {
        Command::Help => {
            println!("{}", USAGE);
            ExitCode::SUCCESS
        }
        Command::Settle(args) => match run(args) {
            Ok(code) => exit(code),
            Err(err) => {
                tracing::error!("{:#}", err);
                eprintln!("error: {:#}", err);
                exit(EXIT_INTERNAL)
            }
        },
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Logs go to stderr so stdout carries only JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tripsplit_core=debug` - Trace splits and planner decisions
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
