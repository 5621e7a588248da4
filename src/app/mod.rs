//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod config;
pub mod forms;
pub mod update;

use ratatui::style::Color;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::context::AdminContext;
use crate::error::AdminResult;
use crate::form::FormState;
use crate::model::{Permission, PermissionField, Role, RoleField, User, UserField};
use crate::view::ListView;

pub use forms::{EntityForm, EntityKind, FormRow};

/// Top-level active tab in the UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Dashboard,
    Users,
    Roles,
    Permissions,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        ActiveTab::Dashboard,
        ActiveTab::Users,
        ActiveTab::Roles,
        ActiveTab::Permissions,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ActiveTab::Dashboard => "Dashboard",
            ActiveTab::Users => "Users",
            ActiveTab::Roles => "Roles",
            ActiveTab::Permissions => "Permissions",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ActiveTab::Dashboard => ActiveTab::Users,
            ActiveTab::Users => ActiveTab::Roles,
            ActiveTab::Roles => ActiveTab::Permissions,
            ActiveTab::Permissions => ActiveTab::Dashboard,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveTab::Dashboard => ActiveTab::Permissions,
            ActiveTab::Users => ActiveTab::Dashboard,
            ActiveTab::Roles => ActiveTab::Users,
            ActiveTab::Permissions => ActiveTab::Roles,
        }
    }

    /// Accepts the tab title in any case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.title().eq_ignore_ascii_case(s.trim()))
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Login,
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub failure: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            failure: Color::Rgb(0xf3, 0x8b, 0xa8),      // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for (key, val) in config::key_values(&contents) {
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "success" => theme.success = color,
                "failure" => theme.failure = color,
                _ => {}
            }
        }
        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or special names: "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# rbac-admin theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success", self.success);
        kv("failure", self.failure);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the current default theme and return it.
    /// If present, load from it; on parse errors, return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(err) = t.write_file(path) {
            tracing::warn!(path, error = %err, "could not write default theme");
        }
        t
    }
}

/// Outcome of a background store operation, shown as a transient banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Failure(m) => m,
        }
    }
}

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    Form(Box<EntityForm>),
    DeleteConfirm {
        kind: EntityKind,
        id: String,
        name: String,
        selected: usize,
    },
    Info {
        message: String,
    },
}

pub struct AppState {
    pub ctx: AdminContext,
    pub runtime: Handle,
    pub started_at: Instant,
    pub active_tab: ActiveTab,
    pub input_mode: InputMode,
    pub users: ListView<User>,
    pub roles: ListView<Role>,
    pub permissions: ListView<Permission>,
    pub rows_per_page: usize,
    pub theme: Theme,
    pub modal: Option<ModalState>,
    pub login: FormState,
    pub login_focus: usize,
    pub login_pending: bool,
    pub notices: Vec<(Instant, Notice)>,
    pub notice_tx: UnboundedSender<Notice>,
    notice_rx: UnboundedReceiver<Notice>,
}

impl AppState {
    /// Create the application state around an existing context.
    ///
    /// `runtime` runs every store operation; the UI thread never blocks on one.
    pub fn new(ctx: AdminContext, runtime: Handle, theme: Theme) -> AdminResult<Self> {
        let (notice_tx, notice_rx) = unbounded_channel();
        let input_mode = if ctx.session.is_authenticated() {
            InputMode::Normal
        } else {
            InputMode::Login
        };
        Ok(Self {
            ctx,
            runtime,
            started_at: Instant::now(),
            active_tab: ActiveTab::Dashboard,
            input_mode,
            users: ListView::new([UserField::Name, UserField::Email, UserField::Roles]),
            roles: ListView::new([RoleField::Name, RoleField::Description]),
            permissions: ListView::new([PermissionField::Name, PermissionField::Description]),
            rows_per_page: 10,
            theme,
            modal: None,
            login: forms::login_form()?,
            login_focus: 0,
            login_pending: false,
            notices: Vec::new(),
            notice_tx,
            notice_rx,
        })
    }

    /// Pull finished background results into the visible notice list and
    /// expire old ones.
    pub fn drain_notices(&mut self) {
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.notices.push((Instant::now(), notice));
        }
        self.notices.retain(|(at, _)| at.elapsed() < NOTICE_TTL);
    }

    /// Bring every list view up to date with its store.
    pub fn sync_views(&mut self) {
        self.users.sync(&self.ctx.users);
        self.roles.sync(&self.ctx.roles);
        self.permissions.sync(&self.ctx.permissions);
    }

    pub fn is_loading(&self) -> bool {
        match self.active_tab {
            ActiveTab::Dashboard => {
                self.ctx.users.is_loading()
                    || self.ctx.roles.is_loading()
                    || self.ctx.permissions.is_loading()
            }
            ActiveTab::Users => self.ctx.users.is_loading(),
            ActiveTab::Roles => self.ctx.roles.is_loading(),
            ActiveTab::Permissions => self.ctx.permissions.is_loading(),
        }
    }

    /// Search query of the active list, or empty on the dashboard.
    pub fn search_query(&self) -> &str {
        match self.active_tab {
            ActiveTab::Dashboard => "",
            ActiveTab::Users => self.users.search.query(),
            ActiveTab::Roles => self.roles.search.query(),
            ActiveTab::Permissions => self.permissions.search.query(),
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
