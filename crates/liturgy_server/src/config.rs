//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use liturgy_docs::DocumentStyle;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::listen_addr`].
pub const ENV_LISTEN: &str = "LITURGY_LISTEN";
/// Environment variable overriding [`ServerConfig::log_filter`].
pub const ENV_LOG: &str = "LITURGY_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(with = "socket_addr_serde")]
    pub listen_addr: SocketAddr,

    /// Attachment name used when a request carries no `filename`.
    pub default_filename: String,

    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,

    /// Directory for daily-rolling log files. Console only when unset.
    pub log_dir: Option<PathBuf>,

    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub log_filter: String,

    /// Typography and page geometry of generated documents.
    pub style: DocumentStyle,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_filename: "liturgy.docx".to_string(),
            max_body_bytes: 2 * 1024 * 1024,
            log_dir: None,
            log_filter: "info,liturgy_server=debug,liturgy_docs=info,tower_http=debug".to_string(),
            style: DocumentStyle::default(),
        }
    }
}

/// A problem found while loading the config. Loading never fails; each
/// problem falls back to a default and is logged once logging is up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("Cannot read config file {path}, using defaults: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Corrupt config file {path}, using defaults: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Ignoring invalid {var}={value:?}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Effective config plus whatever had to be ignored to build it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ServerConfig,
    pub warnings: Vec<ConfigWarning>,
}

impl LoadedConfig {
    /// Emit every collected warning through `tracing`.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{warning}");
        }
    }
}

impl ServerConfig {
    /// Load the optional JSON config file, then apply `LITURGY_LISTEN` /
    /// `LITURGY_LOG` from the process environment.
    pub fn load(path: Option<&Path>) -> LoadedConfig {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> LoadedConfig {
        let mut warnings = Vec::new();
        let config = match path.map(Self::from_file) {
            Some(Ok(config)) => config,
            Some(Err(warning)) => {
                warnings.push(warning);
                Self::default()
            }
            None => Self::default(),
        };
        let config = config.with_overrides_from(lookup, &mut warnings);
        LoadedConfig { config, warnings }
    }

    /// Read a JSON config file. A missing file yields the defaults.
    fn from_file(path: &Path) -> Result<Self, ConfigWarning> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|e| ConfigWarning::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&data).map_err(|e| ConfigWarning::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Self {
        if let Some(value) = lookup(ENV_LISTEN) {
            match value.parse() {
                Ok(addr) => self.listen_addr = addr,
                Err(e) => warnings.push(ConfigWarning::InvalidEnv {
                    var: ENV_LISTEN,
                    value,
                    reason: format!("{e}"),
                }),
            }
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

mod socket_addr_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::net::SocketAddr;

    pub fn serialize<S: Serializer>(addr: &SocketAddr, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&addr.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SocketAddr, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
