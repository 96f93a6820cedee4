use anyhow::{Context, Result};
use clap::Parser;
use gitdeck::app::App;
use gitdeck::backend::LocalBackend;
use gitdeck::cli::Cli;
use gitdeck::styles::{init_theme, ThemeType};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "gitdeck.log";

/// Set up panic hook to restore terminal state on panic
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Leave raw mode first so the panic message is readable
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));
}

/// File logging; the returned guard flushes pending lines when dropped
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = gitdeck::utils::get_log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = init_logging()?;
    let config = cli.load_config()?;

    if cli.command.is_some() {
        return cli.execute(&config);
    }

    setup_panic_hook();
    if let Err(e) = config.theme.parse::<ThemeType>() {
        warn!("{}; falling back to the dark theme", e);
    }
    init_theme(ThemeType::resolve(&config.theme));
    for (key, reason) in config.keymap.invalid_overrides() {
        warn!("Ignoring keymap override '{}': {}", key, reason);
    }

    let log_file = gitdeck::utils::get_log_dir().join(LOG_FILE);
    eprintln!("Logs are being written to: {:?}", log_file);
    info!("Starting with repositories in {:?}", config.repos_dir);

    let backend = Arc::new(LocalBackend::new(config.repos_dir.clone()));
    let mut app = App::new(config, cli.config_path(), backend)?;
    let result = app.run();

    drop(guard);
    result
}
