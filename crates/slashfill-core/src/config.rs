//! Configuration types for slashfill.
//!
//! [`Config::load`] reads `~/.config/slashfill/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::types::InsertionMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[storage]
# Empty means $XDG_DATA_HOME/slashfill/entries.json
path = ""

[ui]
theme                  = "default"
entries_pane_width_pct = 45
overlay_max_items      = 8
overlay_width          = 48

[insertion]
# replace_value   : the selected value replaces the whole input
# replace_fragment: only the /fragment before the cursor is replaced
mode = "replace_value"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/slashfill/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub insertion: InsertionConfig,
}

/// `[storage]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: String,
}

impl StorageConfig {
    /// The configured store path, or the XDG data default when unset.
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.trim().is_empty() {
            default_store_path()
        } else {
            expand_home(&self.path)
        }
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_entries_pane_width_pct")]
    pub entries_pane_width_pct: u16,
    #[serde(default = "default_overlay_max_items")]
    pub overlay_max_items: u16,
    #[serde(default = "default_overlay_width")]
    pub overlay_width: u16,
}

fn default_theme() -> String { "default".to_string() }
fn default_entries_pane_width_pct() -> u16 { 45 }
fn default_overlay_max_items() -> u16 { 8 }
fn default_overlay_width() -> u16 { 48 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            entries_pane_width_pct: default_entries_pane_width_pct(),
            overlay_max_items: default_overlay_max_items(),
            overlay_width: default_overlay_width(),
        }
    }
}

/// `[insertion]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsertionConfig {
    #[serde(default)]
    pub mode: InsertionMode,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/slashfill/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file, layered on top of the built-in defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| fallback.iter().fold(home_dir(), |p, part| p.join(part)))
}

fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
        .join("slashfill")
        .join("config.toml")
}

fn default_store_path() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
        .join("slashfill")
        .join("entries.json")
}

fn expand_home(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(raw),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
