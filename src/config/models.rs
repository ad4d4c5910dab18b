// src/config/models.rs
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How incoming connections are balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceMode {
    /// Raw byte relay between client and backend.
    Tcp,
    /// HTTP/1.x reverse proxy.
    Http,
}

impl FromStr for BalanceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(BalanceMode::Tcp),
            "http" => Ok(BalanceMode::Http),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for BalanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceMode::Tcp => f.write_str("tcp"),
            BalanceMode::Http => f.write_str("http"),
        }
    }
}

/// Values read from an optional configuration file. Every field may be
/// overridden from the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub mode: Option<String>,
    pub bind: Option<String>,
    pub backends: Vec<String>,
}

/// Fully resolved and validated settings the balancer runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mode: BalanceMode,
    pub bind: String,
    pub backends: Vec<String>,
}

impl Settings {
    /// Address to hand to the socket layer. A bare `:port` listens on every
    /// interface.
    pub fn bind_address(&self) -> String {
        normalize_bind(&self.bind)
    }
}

pub(crate) fn normalize_bind(bind: &str) -> String {
    if bind.starts_with(':') {
        format!("0.0.0.0{}", bind)
    } else {
        bind.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("specify the address to listen on with --bind")]
    MissingBind,

    #[error("please specify backend servers")]
    NoBackends,

    #[error("invalid balance mode {0}")]
    InvalidMode(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}
