//! Configuration file parser for ~/.config/todoterm/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde and reported with a warning, since
//! they are usually typos.
use crate::filter::Filter;
use crate::todo::DEFAULT_OWNER_ID;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Base URL used when neither the config file nor `--base-url` sets one.
pub const DEFAULT_BASE_URL: &str = "https://mate.academy/students-api";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large ({0})")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Settings read from the config file. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the todos API; endpoints are resolved under it.
    pub base_url: String,

    /// Owner id every todo is scoped to.
    pub owner_id: i64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// How long an error stays on screen, in seconds. 0 = until dismissed.
    pub error_display_secs: u64,

    /// Filter selected at startup: "all", "active" or "completed".
    pub default_filter: String,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Write tracing output to this file instead of stderr.
    pub log_file: Option<PathBuf>,

    /// Action name to key string, e.g. `toggle_all = "Ctrl+a"`.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            owner_id: DEFAULT_OWNER_ID,
            request_timeout_secs: 30,
            error_display_secs: 3,
            default_filter: "all".to_string(),
            theme: "dark".to_string(),
            log_file: None,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "base_url",
        "owner_id",
        "request_timeout_secs",
        "error_display_secs",
        "default_filter",
        "theme",
        "log_file",
        "keybindings",
    ];

    /// Read `path` into a `Config`.
    ///
    /// A missing or blank file gives the defaults. Files over 1 MB are
    /// rejected before parsing; malformed TOML is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                Self::MAX_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        warn_unknown_keys(&text);
        let config: Config = toml::from_str(&text)?;
        tracing::info!(
            path = %path.display(),
            base_url = %config.base_url,
            owner_id = config.owner_id,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// `None` means errors stay until dismissed.
    pub fn error_display(&self) -> Option<Duration> {
        match self.error_display_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Startup filter; unrecognized names fall back to `All` with a warning.
    pub fn initial_filter(&self) -> Filter {
        Filter::from_str_name(&self.default_filter).unwrap_or_else(|| {
            tracing::warn!(value = %self.default_filter, "Unknown default_filter, using 'all'");
            Filter::All
        })
    }
}

/// Serde ignores unknown keys; surface them since they are usually typos.
fn warn_unknown_keys(text: &str) {
    let Ok(table) = text.parse::<toml::Table>() else {
        return;
    };
    for key in table.keys().filter(|k| !Config::KNOWN_KEYS.contains(&k.as_str())) {
        tracing::warn!(key = %key, "Ignoring unknown config key");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("todoterm_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.owner_id, DEFAULT_OWNER_ID);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.error_display(), Some(Duration::from_secs(3)));
        assert_eq!(config.initial_filter(), Filter::All);
        assert!(config.log_file.is_none());
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/todoterm_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.owner_id, DEFAULT_OWNER_ID);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "owner_id = 42\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.owner_id, 42);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.error_display_secs, 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
base_url = "http://127.0.0.1:3000/api"
owner_id = 7
request_timeout_secs = 5
error_display_secs = 0
default_filter = "Active"
theme = "light"
log_file = "/tmp/todoterm.log"

[keybindings]
quit = "Ctrl+q"
toggle_all = "T"
"#;
        let (dir, path) = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000/api");
        assert_eq!(config.owner_id, 7);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.error_display(), None);
        assert_eq!(config.initial_filter(), Filter::Active);
        assert_eq!(config.theme, "light");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/todoterm.log")));
        assert_eq!(
            config.keybindings.get("toggle_all").map(String::as_str),
            Some("T")
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("not valid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("wrongtype", "owner_id = \"me\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "theme = \"dark\"\nuser_id = 5\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_unknown_filter_falls_back_to_all() {
        let config = Config {
            default_filter: "someday".into(),
            ..Config::default()
        };
        assert_eq!(config.initial_filter(), Filter::All);
    }
}
