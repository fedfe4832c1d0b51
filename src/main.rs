use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tickerwheel::app::{self, DisplayMode};
use tickerwheel::config::fetch_config;
use tickerwheel::logging::{self, DEFAULT_LOG_FILE, LogSink};

/// Rotating live ticker display.
///
/// Reads SYMBOLS and TOGGLE_RATE from the environment (or a .env file).
#[derive(Debug, Parser)]
#[command(name = "tickerwheel", version, about)]
struct Cli {
    /// Show the ticker in a full-screen terminal UI instead of plain text.
    #[arg(long)]
    ui: bool,

    /// Log file used while the terminal UI is active.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mode = if cli.ui {
        DisplayMode::Graphical
    } else {
        DisplayMode::Text
    };

    let _log_guard = match logging::init(&LogSink::for_mode(mode, &cli.log_file)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("tickerwheel: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match fetch_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tickerwheel: {e}");
            return ExitCode::FAILURE;
        }
    };

    match app::run(config, mode).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tickerwheel: {e}");
            ExitCode::FAILURE
        }
    }
}
