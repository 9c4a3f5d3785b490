use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::{CredentialSource, DEFAULT_ENV_VAR};

/// Object-store endpoint settings (`[s3]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// Base URL; objects are addressed path-style as `<endpoint>/<bucket>/<key>`.
    pub endpoint: String,
    /// Region used in the request signature scope.
    pub region: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall deadline per request in seconds.
    pub timeout_secs: u64,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: "https://s3.amazonaws.com".to_string(),
            region: "us-east-1".to_string(),
            connect_timeout_secs: 15,
            timeout_secs: 300,
        }
    }
}

impl S3Config {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/trayrepo/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrayConfig {
    /// Default repository (bucket) id; the CLI `--repo` flag overrides it.
    #[serde(default)]
    pub repo_id: Option<String>,
    /// Credentials file; if missing, `~/.trayrepo` is used.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    /// Environment variable consulted when the credentials file is unusable.
    pub credentials_env: String,
    /// Intermediate buffer size for the artifact copy.
    pub copy_buffer_bytes: usize,
    /// Log file; if missing, `$XDG_STATE_HOME/trayrepo/trayrepo.log` is used.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub s3: S3Config,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            repo_id: None,
            credentials_file: None,
            credentials_env: DEFAULT_ENV_VAR.to_string(),
            copy_buffer_bytes: 4096,
            log_file: None,
            s3: S3Config::default(),
        }
    }
}

impl TrayConfig {
    /// Credential lookup described by this config.
    pub fn credential_source(&self) -> CredentialSource {
        match &self.credentials_file {
            Some(path) => CredentialSource::new(Some(path.clone()), self.credentials_env.clone()),
            None => {
                let default = CredentialSource::user_default();
                CredentialSource::new(default.file().cloned(), self.credentials_env.clone())
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("trayrepo")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TrayConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TrayConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TrayConfig = toml::from_str(&data)?;
    Ok(cfg)
}
