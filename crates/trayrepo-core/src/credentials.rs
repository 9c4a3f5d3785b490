//! Access key / secret key acquisition.
//!
//! Credentials come from the first line of a per-user file (`accessKey:secretKey`),
//! falling back to an environment variable in the same format. Values are only
//! split and indexed; nothing else is validated.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::ResolveError;

/// Default environment variable holding `accessKey:secretKey`.
pub const DEFAULT_ENV_VAR: &str = "TRAY_REPO_CREDS";

/// Default credentials file name, relative to the home directory.
pub const DEFAULT_FILE_NAME: &str = ".trayrepo";

/// Access key pair passed to the object store for request signing.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Why a single credential source could not produce credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("no credentials file configured and no home directory found")]
    NoFile,
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is empty")]
    Empty(String),
    #[error("environment variable {0} is not set")]
    EnvMissing(String),
    #[error("expected accessKey:secretKey")]
    Malformed,
}

/// Split `accessKey:secretKey`. Fields after the second are ignored.
///
/// Trailing empty fields are dropped before indexing, so `key:` has only one
/// field and is rejected while `key::x` yields an empty secret.
pub fn parse_line(line: &str) -> Result<Credentials, CredentialsError> {
    let mut fields: Vec<&str> = line.split(':').collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    match fields.as_slice() {
        [access, secret, ..] => Ok(Credentials {
            access_key_id: (*access).to_string(),
            secret_key: (*secret).to_string(),
        }),
        _ => Err(CredentialsError::Malformed),
    }
}

/// Where to look for credentials: a file first, then an environment variable.
#[derive(Debug, Clone)]
pub struct CredentialSource {
    file: Option<PathBuf>,
    env_var: String,
}

impl CredentialSource {
    pub fn new(file: Option<PathBuf>, env_var: impl Into<String>) -> Self {
        Self {
            file,
            env_var: env_var.into(),
        }
    }

    /// `~/.trayrepo` and `TRAY_REPO_CREDS`.
    pub fn user_default() -> Self {
        Self::new(
            dirs_next::home_dir().map(|home| home.join(DEFAULT_FILE_NAME)),
            DEFAULT_ENV_VAR,
        )
    }

    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// Load credentials from the file, falling back to the process environment.
    pub fn load(&self) -> Result<Credentials, ResolveError> {
        self.load_with_env(std::env::var(&self.env_var).ok())
    }

    /// Like [`load`](Self::load) with the environment value supplied by the caller.
    pub fn load_with_env(&self, env_value: Option<String>) -> Result<Credentials, ResolveError> {
        let file_err = match self.read_file() {
            Ok(creds) => return Ok(creds),
            Err(e) => e,
        };
        tracing::warn!(
            error = %file_err,
            env_var = %self.env_var,
            "credentials file unusable, trying environment"
        );

        let env_err = match env_value {
            Some(value) => match parse_line(&value) {
                Ok(creds) => return Ok(creds),
                Err(e) => e,
            },
            None => CredentialsError::EnvMissing(self.env_var.clone()),
        };
        tracing::warn!(error = %env_err, env_var = %self.env_var, "credentials environment unusable");

        Err(ResolveError::CredentialsUnavailable {
            file: file_err,
            env: env_err,
        })
    }

    fn read_file(&self) -> Result<Credentials, CredentialsError> {
        let path = self.file.as_ref().ok_or(CredentialsError::NoFile)?;
        let data = fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: path.clone(),
            source,
        })?;
        let line = data
            .lines()
            .next()
            .ok_or_else(|| CredentialsError::Empty(path.display().to_string()))?;
        parse_line(line)
    }
}
