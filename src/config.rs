//! Runtime configuration for the `mesa-chd` binary.
//!
//! Configuration is read once at startup into an [`AppConfig`] value and then
//! passed explicitly to the logging setup and presenter selection.

use std::path::PathBuf;
use std::str::FromStr;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;
use crate::MesaError;

pub const LOG_MODE_ENV: &str = "MESA_LOG_MODE";
pub const LOG_FILE_ENV: &str = "MESA_LOG_FILE";
pub const LOG_FILTER_ENV: &str = "MESA_LOG_FILTER";
pub const OUTPUT_ENV: &str = "MESA_OUTPUT";
pub const SANITIZE_MAX_BYTES_ENV: &str = "MESA_SANITIZE_MAX_BYTES";

const DEFAULT_LOG_FILE: &str = "mesa-chd.log";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Standard error, keeping stdout for results
    Stderr,
    /// Append to `log_file`
    File,
    Off,
}

impl FromStr for LogMode {
    type Err = MesaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stderr" => Ok(Self::Stderr),
            "file" => Ok(Self::File),
            "off" | "none" => Ok(Self::Off),
            other => Err(MesaError::Config(format!("unknown log mode '{other}'"))),
        }
    }
}

/// Result rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = MesaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(MesaError::Config(format!("unknown output format '{other}'"))),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub output: OutputFormat,
    /// Per-line cap for log sanitization
    pub sanitize_max_bytes: usize,
    /// Problems found while reading configuration; defaults were used instead
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_mode: LogMode::Stderr,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            output: OutputFormat::Text,
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; invalid values fall back to
    /// defaults and are recorded in `warnings`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup(LOG_MODE_ENV) {
            match mode.parse::<LogMode>() {
                Ok(mode) => config.log_mode = mode,
                Err(e) => config.warnings.push(format!("{LOG_MODE_ENV}: {e}")),
            }
        }
        if let Some(path) = lookup(LOG_FILE_ENV).filter(|p| !p.trim().is_empty()) {
            config.log_file = PathBuf::from(path);
        }
        if let Some(filter) = lookup(LOG_FILTER_ENV).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(output) = lookup(OUTPUT_ENV) {
            match output.parse::<OutputFormat>() {
                Ok(output) => config.output = output,
                Err(e) => config.warnings.push(format!("{OUTPUT_ENV}: {e}")),
            }
        }
        if let Some(raw) = lookup(SANITIZE_MAX_BYTES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => config.sanitize_max_bytes = v,
                _ => config
                    .warnings
                    .push(format!("{SANITIZE_MAX_BYTES_ENV}: expected a positive integer, got '{raw}'")),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_mode, LogMode::Stderr);
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (LOG_MODE_ENV, "FILE"),
            (LOG_FILE_ENV, "/tmp/mesa.log"),
            (LOG_FILTER_ENV, "mesa_chd=debug"),
            (OUTPUT_ENV, "json"),
            (SANITIZE_MAX_BYTES_ENV, "2048"),
        ]);
        assert_eq!(config.log_mode, LogMode::File);
        assert_eq!(config.log_file, PathBuf::from("/tmp/mesa.log"));
        assert_eq!(config.log_filter, "mesa_chd=debug");
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.sanitize_max_bytes, 2048);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            (LOG_MODE_ENV, "syslog"),
            (OUTPUT_ENV, "xml"),
            (SANITIZE_MAX_BYTES_ENV, "0"),
        ]);
        assert_eq!(config.log_mode, LogMode::Stderr);
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.sanitize_max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        assert_eq!(config.warnings.len(), 3);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("off".parse::<LogMode>().ok(), Some(LogMode::Off));
        assert_eq!(" Json ".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
