// src/config/mod.rs
mod cli;
mod models;

pub use cli::Cli;
pub use models::*;

use std::path::Path;

/// Load configuration from a file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

    parse_config(path, &contents)
}

fn parse_config(path: &Path, contents: &str) -> Result<FileConfig, ConfigError> {
    let ext = path.extension().and_then(|s| s.to_str());
    let parsed = if ext == Some("yaml") || ext == Some("yml") {
        serde_yaml::from_str(contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    })
}

/// Merge command-line flags over file values and validate the result.
///
/// Bind and backends are checked before the mode, so a missing bind address
/// is reported even when the mode is also wrong.
pub fn resolve(cli: Cli, file: FileConfig) -> Result<Settings, ConfigError> {
    let bind = cli
        .bind
        .or(file.bind)
        .filter(|b| !b.trim().is_empty())
        .ok_or(ConfigError::MissingBind)?;

    let backends = if cli.backends.is_empty() {
        file.backends
    } else {
        cli.backends
    };
    if backends.is_empty() {
        return Err(ConfigError::NoBackends);
    }

    let mode = cli
        .mode
        .or(file.mode)
        .unwrap_or_else(|| "tcp".to_string())
        .parse()?;

    Ok(Settings {
        mode,
        bind,
        backends,
    })
}

/// Parse flags, read the config file if one was named, and resolve settings.
pub async fn from_cli(cli: Cli) -> Result<Settings, ConfigError> {
    let file = match &cli.config {
        Some(path) => load_config(path).await?,
        None => FileConfig::default(),
    };
    resolve(cli, file)
}
