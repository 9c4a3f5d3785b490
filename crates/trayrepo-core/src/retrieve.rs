//! Artifact retrieval: stream an object from the repository to a local file.

use std::path::Path;

use crate::error::ResolveError;
use crate::storage::ArtifactWriter;
use crate::store::ObjectStore;

/// Default intermediate buffer for the copy.
pub const DEFAULT_BUFFER_BYTES: usize = 4096;

/// Fetch `key` from `bucket` and write it to `dest`, replacing any existing file.
///
/// Bytes go to `<dest>.part` first; `dest` is only replaced once the whole
/// object has arrived and been synced. On any error the temp file is removed
/// and `dest` is left as it was. Returns the number of bytes written.
pub fn retrieve_artifact(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    dest: &Path,
    buffer_bytes: usize,
) -> Result<u64, ResolveError> {
    println!("[TRAY REPO] Downloading {}", key);
    tracing::info!(bucket, key, dest = %dest.display(), "downloading artifact");

    let mut writer = ArtifactWriter::create(dest, buffer_bytes).map_err(ResolveError::Local)?;
    let bytes = store
        .get_object(bucket, key, &mut writer)
        .map_err(|e| ResolveError::store(key, e))?;
    writer.finalize().map_err(ResolveError::Local)?;

    tracing::debug!(key, bytes, "artifact written to {}", dest.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::temp_path;
    use crate::store::StoreError;
    use std::io::Write;

    /// Writes `body` in small chunks, then optionally fails.
    struct Chunked {
        body: Vec<u8>,
        fail_after: bool,
    }

    impl ObjectStore for Chunked {
        fn get_object(&self, _: &str, _: &str, sink: &mut dyn Write) -> Result<u64, StoreError> {
            for chunk in self.body.chunks(7) {
                sink.write_all(chunk).map_err(StoreError::Sink)?;
            }
            if self.fail_after {
                return Err(StoreError::Service {
                    status: 500,
                    code: Some("InternalError".into()),
                    message: None,
                });
            }
            Ok(self.body.len() as u64)
        }
    }

    #[test]
    fn writes_full_object() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mod.zip");
        let body: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
        let store = Chunked {
            body: body.clone(),
            fail_after: false,
        };
        let n = retrieve_artifact(&store, "bucket", "/a/b/1/b-1.zip", &dest, 4096).unwrap();
        assert_eq!(n, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
        assert!(!temp_path(&dest).exists());
    }

    #[test]
    fn failed_fetch_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mod.zip");
        let store = Chunked {
            body: vec![1u8; 9000],
            fail_after: true,
        };
        let err = retrieve_artifact(&store, "bucket", "/a/b/1/b-1.zip", &dest, 4096).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageService);
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
    }

    #[test]
    fn failed_fetch_keeps_previous_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mod.zip");
        std::fs::write(&dest, b"previous").unwrap();
        let store = Chunked {
            body: vec![1u8; 100],
            fail_after: true,
        };
        assert!(retrieve_artifact(&store, "bucket", "/k", &dest, 16).is_err());
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous");
    }

    #[test]
    fn unwritable_destination_is_local_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing-dir").join("mod.zip");
        let store = Chunked {
            body: vec![1u8; 10],
            fail_after: false,
        };
        let err = retrieve_artifact(&store, "bucket", "/k", &dest, 4096).unwrap_err();
        assert!(matches!(err, ResolveError::Local(_)));
    }
}
