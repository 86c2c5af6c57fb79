//! Logging configuration for sysrepo clients.
//!
//! Loads from YAML. Every field is optional:
//!
//! ```yaml
//! stderr_level: ERR     # what libsysrepo prints itself
//! syslog_level: NONE
//! forward_level: INF    # what reaches the Rust sink through log_cb
//! tracing_filter: "info,sysrepo=debug"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sysrepo_types::SrLogLevel;
use tracing::info;

use crate::error::{BridgeError, BridgeResult};
use crate::log;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sysrepo/bridge.yaml";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level libsysrepo prints to stderr
    #[serde(default)]
    pub stderr_level: SrLogLevel,

    /// Level libsysrepo sends to syslog
    #[serde(default)]
    pub syslog_level: SrLogLevel,

    /// Most verbose level forwarded through `log_cb`
    #[serde(default = "default_forward_level")]
    pub forward_level: SrLogLevel,

    /// `EnvFilter` directives for the tracing subscriber
    #[serde(default = "default_tracing_filter")]
    pub tracing_filter: String,
}

fn default_forward_level() -> SrLogLevel {
    SrLogLevel::Inf
}

fn default_tracing_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            stderr_level: SrLogLevel::default(),
            syslog_level: SrLogLevel::default(),
            forward_level: default_forward_level(),
            tracing_filter: default_tracing_filter(),
        }
    }
}

impl LogConfig {
    /// Parses configuration from a YAML document.
    pub fn from_yaml_str(content: &str) -> BridgeResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| BridgeError::config(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from `path`.
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            BridgeError::Config { message } => {
                BridgeError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Loads configuration from `path`, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Loads from [`DEFAULT_CONFIG_PATH`] or defaults.
    pub fn load_default() -> BridgeResult<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> BridgeResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| BridgeError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Installs the tracing subscriber with `tracing_filter`.
    pub fn init_tracing(&self) -> BridgeResult<()> {
        log::init_tracing(&self.tracing_filter)
    }

    /// Applies the levels.
    ///
    /// The forward level always takes effect. The native levels and the
    /// log callback need libsysrepo and fail with `NotLinked` without it.
    pub fn apply(&self) -> BridgeResult<()> {
        log::set_forward_level(self.forward_level);
        log::log_stderr(self.stderr_level)?;
        log::log_syslog(self.syslog_level)?;
        log::install_log_callback()?;
        info!(
            "Applied log config: stderr={} syslog={} forward={}",
            self.stderr_level, self.syslog_level, self.forward_level
        );
        Ok(())
    }
}
