//! Object-store capability used by the resolver.

use std::io::Write;

/// Failure of a single `get_object` call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The service answered, but rejected the request (non-2xx).
    #[error("{}", service_message(.status, .code, .message))]
    Service {
        status: u32,
        /// S3 error code from the response body, e.g. `NoSuchKey`.
        code: Option<String>,
        message: Option<String>,
    },
    /// Transport or client-side failure (DNS, connect, TLS, timeout).
    #[error("{0}")]
    Client(#[from] curl::Error),
    /// Invalid client setup (bad endpoint URL, unsignable request).
    #[error("client setup: {0}")]
    Setup(String),
    /// Writing the received bytes failed.
    #[error("write failed: {0}")]
    Sink(#[source] std::io::Error),
}

fn service_message(status: &u32, code: &Option<String>, message: &Option<String>) -> String {
    match (code, message) {
        (Some(c), Some(m)) => format!("HTTP {}: {}: {}", status, c, m),
        (Some(c), None) => format!("HTTP {}: {}", status, c),
        (None, Some(m)) => format!("HTTP {}: {}", status, m),
        (None, None) => format!("HTTP {}", status),
    }
}

/// Read access to objects in a bucket.
pub trait ObjectStore {
    /// Stream the object at `bucket`/`key` into `sink`. Returns the number of bytes written.
    ///
    /// Keys are storage keys as built by [`ModuleIdentifier`](crate::module_id::ModuleIdentifier),
    /// with a leading `/`.
    fn get_object(&self, bucket: &str, key: &str, sink: &mut dyn Write) -> Result<u64, StoreError>;

    /// Fetch a small object and decode it as UTF-8 text.
    fn get_text(&self, bucket: &str, key: &str) -> Result<String, StoreError> {
        let mut buf = Vec::new();
        self.get_object(bucket, key, &mut buf)?;
        String::from_utf8(buf).map_err(|e| {
            StoreError::Sink(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}
