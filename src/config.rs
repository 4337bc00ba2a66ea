use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ENV_API_URL: &str = "CLOUD_DRIVE_API_URL";
pub const ENV_TOKEN: &str = "CLOUD_DRIVE_TOKEN";
pub const ENV_DOWNLOAD_DIR: &str = "CLOUD_DRIVE_DOWNLOAD_DIR";

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub download_dir: Option<PathBuf>,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            download_dir: None,
        }
    }
}

impl DriveConfig {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "cloud-drive")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Defaults, then the user's config file, then environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Self::config_path().as_deref(), |key| std::env::var(key).ok())
    }

    /// Same chain as [`DriveConfig::load`] with an explicit file and environment.
    /// A missing file falls back to defaults.
    pub fn load_from<F>(path: Option<&Path>, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) if path.is_file() => Self::from_file(path)?,
            _ => Self::default(),
        };
        config.apply_env(lookup);
        config.validate().context("invalid cloud drive configuration")?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(token) = non_empty(ENV_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(dir) = non_empty(ENV_DOWNLOAD_DIR) {
            self.download_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "api_base_url must be an http(s) URL: {url}"
            )));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(AppError::Config("timeouts must be positive".to_string()));
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    pub fn resolve_download_dir(&self) -> Option<PathBuf> {
        self.download_dir.clone().or_else(|| {
            UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        })
    }
}
