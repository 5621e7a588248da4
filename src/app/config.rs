//! Settings file: parse/write `rbac-admin.conf`.
//!
//! The file uses the same `key = value` format as the theme file. Command
//! line flags are layered on top by the binary, so every value here is only
//! a default.

use std::time::Duration;

use super::ActiveTab;

/// Iterate `key = value` pairs, skipping blanks, comments and lines with an
/// empty side.
pub fn key_values(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (lhs, rhs) = line.split_once('=')?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        if lhs.is_empty() || rhs.is_empty() {
            return None;
        }
        Some((lhs, rhs))
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Artificial delay applied by the in-memory backends.
    pub latency: Duration,
    pub start_tab: ActiveTab,
    pub theme_file: String,
    pub log_file: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
            start_tab: ActiveTab::Dashboard,
            theme_file: "theme.conf".to_string(),
            log_file: "rbac-admin.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a file, or write and return defaults if it doesn't exist.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        if let Err(err) = cfg.write_file(path) {
            tracing::warn!(path, error = %err, "could not write default settings");
        }
        cfg
    }

    /// Load settings from a file. Unknown keys and unparsable values keep
    /// their defaults.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for (key, value) in key_values(contents) {
            match key {
                "latency_ms" => {
                    if let Ok(ms) = value.parse::<u64>() {
                        cfg.latency = Duration::from_millis(ms);
                    }
                }
                "start_tab" => {
                    if let Some(tab) = ActiveTab::parse(value) {
                        cfg.start_tab = tab;
                    }
                }
                "theme_file" => cfg.theme_file = value.to_string(),
                "log_file" => cfg.log_file = value.to_string(),
                "log_level" => cfg.log_level = value.to_string(),
                _ => {}
            }
        }
        cfg
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# rbac-admin settings\n");
        buf.push_str("# Backend latency in milliseconds (0 disables the delay)\n");
        let _ = writeln!(buf, "latency_ms = {}", self.latency.as_millis());
        buf.push_str("# Start tab: Dashboard|Users|Roles|Permissions\n");
        let _ = writeln!(buf, "start_tab = {}", self.start_tab.title());
        let _ = writeln!(buf, "theme_file = {}", self.theme_file);
        let _ = writeln!(buf, "log_file = {}", self.log_file);
        let _ = writeln!(buf, "log_level = {}", self.log_level);
        std::fs::write(path, buf)
    }
}
