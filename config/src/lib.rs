//! Configuration for the DCL conventions driver.
//!
//! Read from `$DCL_CONFIG`, falling back to `~/.dcl/config.toml`. Every
//! section and every field is optional:
//!
//! ```toml
//! [log]
//! filter = "dcl_core=debug"
//! file = "${HOME}/.dcl/logs/dcl.log"
//!
//! [report]
//! list_records = true
//! ```

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DCL_CONFIG";

/// Filter used when neither `RUST_LOG` nor `[log] filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Default, Deserialize)]
pub struct DclConfig {
    pub log: Option<LogConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directives, e.g. `"warn,dcl_core=debug"`.
    pub filter: Option<String>,
    /// Log file path. `${VAR}` references are expanded. Logs are discarded when unset.
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportConfig {
    /// List every grouped record under its software type.
    #[serde(default)]
    pub list_records: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

impl DclConfig {
    /// Load the config from [`config_path`]. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load the config from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {source}", path.display());
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {source}", path.display());
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log
            .as_ref()
            .and_then(|log| log.filter.as_deref())
            .map(str::trim)
            .filter(|filter| !filter.is_empty())
            .unwrap_or(DEFAULT_LOG_FILTER)
    }

    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        let raw = self.log.as_ref()?.file.as_deref()?;
        let expanded = expand_env_vars(raw);
        let trimmed = expanded.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    #[must_use]
    pub fn list_records(&self) -> bool {
        self.report.as_ref().is_some_and(|report| report.list_records)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::home_dir().map(|home| home.join(".dcl").join("config.toml"))
}

/// Replace every `${VAR}` with the value of `VAR`, or nothing when unset.
/// An unclosed `${` is kept as written.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}
