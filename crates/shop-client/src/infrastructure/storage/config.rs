//! TOML configuration for the client.
//!
//! Reads and writes [`ClientConfig`] at the platform-appropriate location:
//! - Windows:  `%APPDATA%\Shopfront\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/shopfront/config.toml` (or `~/.config/shopfront`)
//! - macOS:    `~/Library/Application Support/Shopfront/config.toml`
//!
//! Example file:
//!
//! ```toml
//! [api]
//! base_url = "http://192.168.1.20:8082/api/v1"
//!
//! [realtime]
//! socket_url = "ws://192.168.1.20:8083"
//! handshake_timeout_ms = 10000
//!
//! [presenter]
//! default_duration_ms = 2000
//! transition_ms = 300
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field has a default (`#[serde(default = ...)]`), so a partial file,
//! an empty file, or no file at all are all valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shop_core::RouteClassification;
use thiserror::Error;

use crate::application::connection_manager::ConnectionConfig;
use crate::application::context::AppSettings;
use crate::application::message_queue::QueueConfig;
use crate::application::request_client::RequestClientConfig;
use crate::infrastructure::socket::WsTransportConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Schema ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub presenter: PresenterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Prefix for every REST path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefixes that never carry credentials.
    #[serde(default = "default_open_routes")]
    pub open_routes: Vec<String>,
    /// Whole-request timeout.  Unset means the HTTP stack's own default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeConfig {
    #[serde(default = "default_socket_url")]
    pub socket_url: String,
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
    #[serde(default = "default_unregister_grace_ms")]
    pub unregister_grace_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresenterConfig {
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8082/api/v1".to_string()
}
fn default_open_routes() -> Vec<String> {
    RouteClassification::default().open_prefixes().to_vec()
}
fn default_socket_url() -> String {
    "ws://127.0.0.1:8083".to_string()
}
fn default_handshake_timeout_ms() -> u64 {
    10_000
}
fn default_unregister_grace_ms() -> u64 {
    500
}
fn default_duration_ms() -> u64 {
    2_000
}
fn default_transition_ms() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            open_routes: default_open_routes(),
            request_timeout_ms: None,
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            socket_url: default_socket_url(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            unregister_grace_ms: default_unregister_grace_ms(),
        }
    }
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            transition_ms: default_transition_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Conversions into component configs ────────────────────────────────────────

impl ClientConfig {
    pub fn request_client(&self) -> RequestClientConfig {
        let mut cfg = RequestClientConfig::new(self.api.base_url.as_str());
        cfg.routes = RouteClassification::new(self.api.open_routes.iter().cloned());
        cfg
    }

    /// Component settings handed to `AppContext::new`.
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            request_client: self.request_client(),
            connection: self.connection(),
            queue: self.queue(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn ws_transport(&self) -> WsTransportConfig {
        WsTransportConfig {
            url: self.realtime.socket_url.clone(),
            handshake_timeout: Duration::from_millis(self.realtime.handshake_timeout_ms),
        }
    }

    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            unregister_grace: Duration::from_millis(self.realtime.unregister_grace_ms),
        }
    }

    pub fn queue(&self) -> QueueConfig {
        QueueConfig {
            default_duration: Duration::from_millis(self.presenter.default_duration_ms),
            transition: Duration::from_millis(self.presenter.transition_ms),
        }
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

/// Platform directory holding `config.toml` and `credentials.toml`.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the base directory cannot
/// be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// # Errors
///
/// See [`config_dir`].
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from its platform location.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `path`, returning `ClientConfig::default()` if it does not exist.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system failures,
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &ClientConfig, path: &Path) -> Result<(), ConfigError> {
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

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Shopfront"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Shopfront")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("shopfront"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
