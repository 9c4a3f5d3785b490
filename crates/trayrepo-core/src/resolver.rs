//! Module resolution against a tray repository.
//!
//! One linear call chain: credentials, storage client, `maven-metadata.xml`,
//! artifact name, artifact download. Every failure is reported and collapses
//! to "not resolved" for [`RepoResolver`] callers; [`TrayRepoResolver::try_get_module`]
//! keeps the typed error.

use std::path::{Path, PathBuf};

use crate::config::{S3Config, TrayConfig};
use crate::credentials::{CredentialSource, Credentials};
use crate::error::ResolveError;
use crate::metadata::resolve_artifact_name;
use crate::module_id::ModuleIdentifier;
use crate::retrieve::{retrieve_artifact, DEFAULT_BUFFER_BYTES};
use crate::s3::S3Client;
use crate::store::{ObjectStore, StoreError};

/// Resolver plug-in seam of the module system.
pub trait RepoResolver {
    /// Fetch the module's artifact to `dest`. Returns `false` if it could not be resolved.
    fn get_module(&self, dest: &Path, id: &ModuleIdentifier) -> bool;

    /// Whether this resolver uses the pre-Maven repository layout.
    fn is_old_style(&self) -> bool;
}

/// Builds an object-store client once credentials are known.
pub trait StoreFactory {
    type Store: ObjectStore;

    fn connect(&self, credentials: Credentials) -> Result<Self::Store, StoreError>;
}

impl StoreFactory for S3Config {
    type Store = S3Client;

    fn connect(&self, credentials: Credentials) -> Result<S3Client, StoreError> {
        S3Client::new(self, credentials)
    }
}

/// A successfully fetched artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// Object key the artifact was read from.
    pub key: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Resolves modules from one repository (bucket) laid out like a Maven repo.
pub struct TrayRepoResolver<F> {
    repo_id: String,
    credentials: CredentialSource,
    factory: F,
    copy_buffer_bytes: usize,
    mod_suffix: bool,
}

impl TrayRepoResolver<S3Config> {
    /// Resolver for `repo_id` using the S3 endpoint and credential sources in `cfg`.
    pub fn from_config(cfg: &TrayConfig, repo_id: impl Into<String>) -> Self {
        TrayRepoResolver::new(repo_id, cfg.credential_source(), cfg.s3.clone())
            .with_copy_buffer(cfg.copy_buffer_bytes)
    }
}

impl<F: StoreFactory> TrayRepoResolver<F> {
    pub fn new(repo_id: impl Into<String>, credentials: CredentialSource, factory: F) -> Self {
        Self {
            repo_id: repo_id.into(),
            credentials,
            factory,
            copy_buffer_bytes: DEFAULT_BUFFER_BYTES,
            mod_suffix: false,
        }
    }

    pub fn with_copy_buffer(mut self, bytes: usize) -> Self {
        self.copy_buffer_bytes = bytes;
        self
    }

    /// Insert `-mod` before the artifact extension.
    pub fn with_mod_suffix(mut self, mod_suffix: bool) -> Self {
        self.mod_suffix = mod_suffix;
        self
    }

    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    /// Resolve `id` and write its artifact to `dest`.
    pub fn try_get_module(
        &self,
        dest: &Path,
        id: &ModuleIdentifier,
    ) -> Result<ResolvedArtifact, ResolveError> {
        let credentials = self.credentials.load()?;
        let store = self
            .factory
            .connect(credentials)
            .map_err(|e| ResolveError::store(&self.repo_id, e))?;

        let metadata_key = id.metadata_key();
        tracing::debug!(module = %id, key = %metadata_key, "fetching metadata");
        let metadata = store
            .get_text(&self.repo_id, &metadata_key)
            .map_err(|e| ResolveError::store(&metadata_key, e))?;
        let name = resolve_artifact_name(&metadata, id, self.mod_suffix).map_err(|source| {
            ResolveError::Metadata {
                key: metadata_key.clone(),
                source,
            }
        })?;

        let key = format!("{}{}", id.storage_key(), name);
        let bytes = retrieve_artifact(&store, &self.repo_id, &key, dest, self.copy_buffer_bytes)?;
        tracing::info!(module = %id, key = %key, bytes, "module resolved");

        Ok(ResolvedArtifact {
            key,
            path: dest.to_path_buf(),
            bytes,
        })
    }
}

impl<F: StoreFactory> RepoResolver for TrayRepoResolver<F> {
    fn get_module(&self, dest: &Path, id: &ModuleIdentifier) -> bool {
        match self.try_get_module(dest, id) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(module = %id, kind = ?e.kind(), "module not resolved: {}", e);
                eprintln!("[TRAY REPO] {}", e);
                false
            }
        }
    }

    fn is_old_style(&self) -> bool {
        false
    }
}
