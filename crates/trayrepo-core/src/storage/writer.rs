//! Buffered temp-file writer with atomic finalize.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// Writes an artifact to `<final>.part` through a fixed-size buffer.
///
/// `finalize` flushes, syncs and renames over the final path. Dropping the
/// writer without finalizing removes the temp file, so a failed transfer never
/// leaves partial content behind and never touches the final path.
pub struct ArtifactWriter {
    out: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl ArtifactWriter {
    /// Create (or truncate) the temp file for `final_path`.
    pub fn create(final_path: &Path, buffer_size: usize) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(ArtifactWriter {
            out: Some(BufWriter::with_capacity(buffer_size.max(1), file)),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and atomically rename the temp file to the final path,
    /// replacing any existing file there. The temp file is removed on failure.
    pub fn finalize(mut self) -> Result<()> {
        let out = match self.out.take() {
            Some(out) => out,
            None => anyhow::bail!("writer for {} already closed", self.final_path.display()),
        };
        let result = commit(out, &self.temp_path, &self.final_path);
        if result.is_err() {
            let _ = std::fs::remove_file(&self.temp_path);
        }
        result
    }
}

fn commit(out: BufWriter<File>, temp_path: &Path, final_path: &Path) -> Result<()> {
    let file = out
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("flush {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync {}", temp_path.display()))?;
    drop(file);

    std::fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp_path.display(),
            final_path.display()
        )
    })
}

impl Write for ArtifactWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.out.as_mut() {
            Some(out) => out.write(buf),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "artifact writer closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.out.as_mut() {
            Some(out) => out.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for ArtifactWriter {
    fn drop(&mut self) {
        if let Some(out) = self.out.take() {
            // Unfinalized: discard buffered bytes and the temp file.
            let (file, _) = out.into_parts();
            drop(file);
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        "failed to remove temp file {}: {}",
                        self.temp_path.display(),
                        e
                    );
                }
            }
        }
    }
}
