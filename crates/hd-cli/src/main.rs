//! Headless Hollowdeep session runner.
//!
//! Plays the game over stdin/stdout: line commands become engine intents,
//! the map and message log are printed as plain text.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod session;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "hollowdeep", about = "A turn-based dungeon crawl", version)]
struct Args {
    /// RNG seed for a new game.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Load a saved game instead of starting a new one.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Where the `save` command writes the game.
    #[arg(long, default_value = "hollowdeep-save.json")]
    save_path: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match session::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
