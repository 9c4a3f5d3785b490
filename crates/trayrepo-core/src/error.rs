//! Resolution error taxonomy.

use crate::credentials::CredentialsError;
use crate::metadata::MetadataError;
use crate::store::StoreError;

/// Coarse failure category reported alongside the diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CredentialsUnavailable,
    /// The storage service rejected the request.
    StorageService,
    /// Transport or client-side failure talking to storage.
    StorageClient,
    /// Metadata parse errors, local I/O errors and the rest.
    Unclassified,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no credentials: file: {file}; environment: {env}")]
    CredentialsUnavailable {
        file: CredentialsError,
        env: CredentialsError,
    },
    #[error("{key}: {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("bad metadata at {key}: {source}")]
    Metadata {
        key: String,
        #[source]
        source: MetadataError,
    },
    /// Local file handling for the destination (create, flush, rename).
    #[error("{0:#}")]
    Local(anyhow::Error),
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::CredentialsUnavailable { .. } => ErrorKind::CredentialsUnavailable,
            ResolveError::Store { source, .. } => match source {
                StoreError::Service { .. } => ErrorKind::StorageService,
                StoreError::Client(_) | StoreError::Setup(_) => ErrorKind::StorageClient,
                StoreError::Sink(_) => ErrorKind::Unclassified,
            },
            ResolveError::Metadata { .. } | ResolveError::Local(_) => ErrorKind::Unclassified,
        }
    }

    pub(crate) fn store(key: &str, source: StoreError) -> Self {
        ResolveError::Store {
            key: key.to_string(),
            source,
        }
    }
}
