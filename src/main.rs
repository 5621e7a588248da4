//! rbac-admin binary entry point.
//!
//! Resolves settings from flags, environment and the settings file, starts
//! file logging and the async runtime, runs the TUI event loop and restores
//! the terminal state on exit.
//!
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rbac_admin::app::config::Settings;
use rbac_admin::app::{self, ActiveTab, AppState, Theme};
use rbac_admin::context::AdminContext;
use rbac_admin::error::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "rbac-admin", version, about = "Administer users, roles and permissions")]
struct Args {
    /// Settings file; written with defaults when missing
    #[arg(long, env = "RBAC_ADMIN_CONFIG", default_value = "rbac-admin.conf")]
    config: String,

    /// Simulated backend latency in milliseconds
    #[arg(long, env = "RBAC_ADMIN_LATENCY_MS")]
    latency_ms: Option<u64>,

    /// Theme file (key = value colours)
    #[arg(long, env = "RBAC_ADMIN_THEME")]
    theme: Option<String>,

    #[arg(long, env = "RBAC_ADMIN_LOG_FILE")]
    log_file: Option<String>,

    /// Filter directive used when RUST_LOG is unset, e.g. "debug"
    #[arg(long, env = "RBAC_ADMIN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Tab shown after sign-in: dashboard, users, roles or permissions
    #[arg(long, env = "RBAC_ADMIN_START_TAB", value_parser = parse_tab)]
    start_tab: Option<ActiveTab>,
}

fn parse_tab(s: &str) -> std::result::Result<ActiveTab, String> {
    ActiveTab::parse(s).ok_or_else(|| format!("unknown tab '{s}'"))
}

impl Args {
    /// Flags win over the settings file.
    fn settings(&self) -> Settings {
        let mut settings = Settings::load_or_init(&self.config);
        if let Some(ms) = self.latency_ms {
            settings.latency = Duration::from_millis(ms);
        }
        if let Some(theme) = &self.theme {
            settings.theme_file = theme.clone();
        }
        if let Some(file) = &self.log_file {
            settings.log_file = file.clone();
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
        if let Some(tab) = self.start_tab {
            settings.start_tab = tab;
        }
        settings
    }
}

/// Log to a file; stdout belongs to the TUI.
fn init_logging(settings: &Settings) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_ctx(|| format!("open log file {}", settings.log_file))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.settings();
    init_logging(&settings)?;
    info!(?settings, "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_ctx(|| "start async runtime".to_string())?;
    let theme = Theme::load_or_init(&settings.theme_file);
    let ctx = AdminContext::seeded(settings.latency);
    let mut state = AppState::new(ctx, runtime.handle().clone(), theme)?;
    state.active_tab = settings.start_tab;

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {e}"))?;

    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();
    runtime.shutdown_timeout(Duration::from_millis(500));

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
