//! TOML-based configuration persistence for touch-relay.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\TouchRelay\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/touch-relay/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/TouchRelay/config.toml`
//!
//! A complete file looks like this; every key is optional:
//!
//! ```toml
//! [relay]
//! interval_ms = 16.0
//! rotate = true
//! button_trigger = "level"   # or "edge"
//! byte_order = "native"      # or "little" / "big"
//! log_level = "info"
//!
//! [device]                   # native extent of the tablet's axes
//! x_min = 0
//! y_min = 0
//! x_max = 20966
//! y_max = 15725
//!
//! [destination]              # omit to use the primary screen
//! x_min = 0
//! y_min = 0
//! x_max = 1920
//! y_max = 1080
//!
//! [source]
//! listen = "0.0.0.0:12345"
//! port_attempts = 16
//! # input = "capture.bin"    # or "-" for stdin; takes precedence over listen
//!
//! [pointer]
//! backend = "native"         # or "xdotool" / "dry-run"
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use `some_fn()` when
//! the key is absent, so a missing or partial file still yields a working
//! configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touch_core::{millis_to_duration, ByteOrder, Rectangle, DEVICE_SOURCE_RECT};

use crate::application::relay_touch::{ButtonTrigger, RelayConfig};
use crate::infrastructure::pointer::PointerBackend;
use crate::infrastructure::transport::{SourceSpec, DEFAULT_LISTEN_PORT, DEFAULT_PORT_ATTEMPTS};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub relay: RelaySection,
    /// Native extent of the device's absolute axes.
    #[serde(default = "default_device")]
    pub device: Rectangle,
    /// Fixed destination; `None` means "primary screen".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Rectangle>,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub pointer: PointerSection,
}

/// Relay loop behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelaySection {
    /// Minimum milliseconds between actuation ticks.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: f64,
    /// Portrait device on a landscape screen.
    #[serde(default = "default_true")]
    pub rotate: bool,
    #[serde(default)]
    pub button_trigger: ButtonTrigger,
    #[serde(default)]
    pub byte_order: ByteOrder,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where frames come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSection {
    /// Address the TCP listener binds first.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Consecutive ports tried when `listen` is busy.
    #[serde(default = "default_port_attempts")]
    pub port_attempts: u16,
    /// Capture file path, or `"-"` for stdin.  Overrides `listen` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

/// Pointer backend selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PointerSection {
    #[serde(default)]
    pub backend: PointerBackend,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_device() -> Rectangle {
    DEVICE_SOURCE_RECT
}
fn default_interval_ms() -> f64 {
    16.0
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_listen() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_LISTEN_PORT)
}
fn default_port_attempts() -> u16 {
    DEFAULT_PORT_ATTEMPTS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relay: RelaySection::default(),
            device: default_device(),
            destination: None,
            source: SourceSection::default(),
            pointer: PointerSection::default(),
        }
    }
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            rotate: default_true(),
            button_trigger: ButtonTrigger::default(),
            byte_order: ByteOrder::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port_attempts: default_port_attempts(),
            input: None,
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// The relay loop configuration described by this file.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            source_rect: self.device,
            interval: millis_to_duration(self.relay.interval_ms),
            rotate: self.relay.rotate,
            button_trigger: self.relay.button_trigger,
            byte_order: self.relay.byte_order,
        }
    }

    /// The byte source described by this file.
    pub fn source_spec(&self) -> SourceSpec {
        match &self.source.input {
            Some(input) => SourceSpec::from_input(input),
            None => SourceSpec::Listen {
                addr: self.source.listen,
                port_attempts: self.source.port_attempts,
            },
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning defaults if the file is absent.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `TouchRelay` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("TouchRelay"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("touch-relay"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("TouchRelay")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
