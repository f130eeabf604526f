//! Optional RON configuration file mapped onto engine settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use panchang_engine::{ExportSettings, FetchSettings, ProbeSettings};
use panchang_logging::{panchang_info, panchang_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILENAME: &str = "panchang.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub max_backoff_secs: u64,
    pub retry_statuses: Vec<u16>,
    pub max_bytes: u64,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub probe: ProbeConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub filename: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            endpoint: fetch.endpoint,
            request_timeout_secs: fetch.request_timeout.as_secs(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            max_retries: fetch.max_retries,
            backoff_factor: fetch.backoff_factor,
            max_backoff_secs: fetch.max_backoff.as_secs(),
            retry_statuses: fetch.retry_statuses,
            max_bytes: fetch.max_bytes,
            user_agent: fetch.user_agent,
            accept: fetch.accept,
            accept_language: fetch.accept_language,
            probe: ProbeConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let probe = ProbeSettings::default();
        Self {
            enabled: probe.enabled,
            host: probe.host,
            port: probe.port,
            timeout_secs: probe.timeout.as_secs(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        let export = ExportSettings::default();
        Self {
            output_dir: export.output_dir,
            filename: export.filename,
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            endpoint: self.endpoint.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_retries: self.max_retries,
            backoff_factor: self.backoff_factor,
            max_backoff: Duration::from_secs(self.max_backoff_secs),
            retry_statuses: self.retry_statuses.clone(),
            max_bytes: self.max_bytes,
            user_agent: self.user_agent.clone(),
            accept: self.accept.clone(),
            accept_language: self.accept_language.clone(),
            probe: ProbeSettings {
                enabled: self.probe.enabled,
                host: self.probe.host.clone(),
                port: self.probe.port,
                timeout: Duration::from_secs(self.probe.timeout_secs),
            },
            ..FetchSettings::default()
        }
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            output_dir: self.export.output_dir.clone(),
            filename: self.export.filename.clone(),
        }
    }
}

/// Load the config. An explicit path must exist and parse; the default
/// `./panchang.ron` is optional and falls back to defaults with a warning
/// when it is broken.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => read(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILENAME);
            match read(path) {
                Ok(config) => Ok(config),
                Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    Ok(AppConfig::default())
                }
                Err(err) => {
                    panchang_warn!("{err}; using defaults");
                    Ok(AppConfig::default())
                }
            }
        }
    }
}

fn read(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    panchang_info!("Loaded config from {:?}", path);
    Ok(config)
}
