//! Destination file lifecycle.
//!
//! Artifacts are written to a `.part` sibling of the destination and renamed
//! into place only after the whole object has been received and synced.

mod writer;

pub use writer::ArtifactWriter;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `mod.zip` → `mod.zip.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
