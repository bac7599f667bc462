//! `hotspot-tui`: terminal console for a Wi-Fi hotspot backend.
//!
//! Three screens (configuration form, connected clients, raw status) are
//! navigable with number keys or Tab. All backend interaction goes through
//! a `hotspot_core::Session`; this binary only renders its snapshots and
//! forwards input.
//!
//! Logs go to a file (default `/tmp/hotspot-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod prompt;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hotspot_api::HotspotClient;
use hotspot_config::FileSettingsStore;
use hotspot_core::{DialogOrchestrator, Language, Session, SessionOptions, SettingsStore, ThemeMode};

use crate::app::App;
use crate::prompt::TerminalPrompt;

const DEFAULT_LOG_FILE: &str = "/tmp/hotspot-tui.log";

/// Terminal console for configuring and monitoring a Wi-Fi hotspot.
#[derive(Parser, Debug)]
#[command(name = "hotspot-tui", version, about)]
struct Cli {
    /// Backend directory holding the *.cgi endpoints
    /// (e.g., http://192.168.1.1/cgi-bin/)
    #[arg(short = 'u', long, env = "HOTSPOT_URL")]
    url: Option<String>,

    /// UI language, overriding the saved choice
    #[arg(long, value_parser = ["zh", "en"])]
    lang: Option<String>,

    /// Color theme, overriding the saved choice
    #[arg(long, value_parser = ["system", "light", "dark"])]
    theme: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path (defaults to /tmp/hotspot-tui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. The guard must live until exit so logs flush.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hotspot_tui={level},hotspot_core={level},hotspot_api={level},hotspot_config={level}"
        ))
    });

    let dir = log_file.parent().unwrap_or(Path::new("/tmp"));
    let name = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("hotspot-tui.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// First non-empty POSIX locale variable.
fn system_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tui::install_hooks()?;

    let config_path = cli.config.clone().unwrap_or_else(hotspot_config::config_path);
    let mut config = hotspot_config::load_config_from(&config_path)?;
    if let Some(url) = &cli.url {
        config.backend_url.clone_from(url);
    }

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let _log_guard = setup_tracing(&log_file, cli.verbose);

    let base_url = config.backend_url()?;
    info!(url = %base_url, config = %config_path.display(), "starting hotspot-tui");
    let client = HotspotClient::new(base_url, &config.transport())?;

    let settings = Arc::new(FileSettingsStore::default_location());
    let mut options = SessionOptions::from_settings(&settings.load(), system_locale().as_deref())
        .with_poll_interval(config.poll_interval());
    if let Some(lang) = cli.lang.as_deref() {
        options.language = Language::from_code(lang);
    }
    if let Some(theme) = cli.theme.as_deref() {
        options.theme = ThemeMode::from_code(theme);
    }

    let dialog = DialogOrchestrator::new(Arc::new(TerminalPrompt));
    let session = Session::new(client, dialog, settings, options);

    App::new(session, theme::terminal_prefers_dark).run().await
}
