//! Artifact file name resolution from `maven-metadata.xml`.
//!
//! This is a substring scan over the descriptor, not an XML parse: it takes the
//! first `<snapshot>`, then the first `<timestamp>` and `<buildNumber>` after
//! it, and slices fixed offsets from the opening tags. Slicing is bounds
//! checked so malformed metadata becomes an error instead of a panic.

use crate::module_id::ModuleIdentifier;

const SNAPSHOT_TAG: &str = "<snapshot>";
const TIMESTAMP_TAG: &str = "<timestamp>";
const BUILD_NUMBER_TAG: &str = "<buildNumber>";

/// Maven snapshot timestamps are always `yyyyMMdd.HHmmss`.
const TIMESTAMP_LEN: usize = 15;

/// Number of trailing characters (not bytes) stripped from snapshot versions,
/// the length of `-SNAPSHOT`.
const SNAPSHOT_QUALIFIER_CHARS: usize = 9;

/// Packaging extension of module artifacts.
const EXTENSION: &str = ".zip";

/// Inserted before the extension when the mod suffix is requested.
const MOD_SUFFIX: &str = "-mod";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata ends inside the snapshot timestamp")]
    TruncatedTimestamp,
    #[error("timestamped snapshot has no <buildNumber>")]
    MissingBuildNumber,
    #[error("unterminated <buildNumber>")]
    UnterminatedBuildNumber,
    #[error("version {0:?} is too short to carry a -SNAPSHOT qualifier")]
    VersionTooShort(String),
}

/// Resolve the artifact file name that `metadata` points at for `id`.
///
/// Without a timestamped snapshot the name is `<name>-<version>.zip`. With one
/// it is `<name>-<base>-<timestamp>-<buildNumber>.zip`, where `<base>` is the
/// version minus its trailing `-SNAPSHOT`. `mod_suffix` inserts `-mod` before
/// the extension in either form.
///
/// Older tray tooling stored timestamped snapshots as `...-<buildNumber>-mod.zip`
/// by default; pass `mod_suffix = true` to fetch those keys.
pub fn resolve_artifact_name(
    metadata: &str,
    id: &ModuleIdentifier,
    mod_suffix: bool,
) -> Result<String, MetadataError> {
    match snapshot_stamp(metadata)? {
        Some(stamp) => {
            let version = id.version();
            let base = snapshot_base(version)
                .ok_or_else(|| MetadataError::VersionTooShort(version.to_string()))?;
            Ok(format!(
                "{}-{}-{}-{}{}{}",
                id.name(),
                base,
                stamp.timestamp,
                stamp.build_number,
                suffix(mod_suffix),
                EXTENSION
            ))
        }
        None => Ok(plain_artifact_name(id, mod_suffix)),
    }
}

/// `<name>-<version>.zip`, used for releases and non-timestamped snapshots.
pub fn plain_artifact_name(id: &ModuleIdentifier, mod_suffix: bool) -> String {
    format!(
        "{}-{}{}{}",
        id.name(),
        id.version(),
        suffix(mod_suffix),
        EXTENSION
    )
}

/// `version` without its last nine characters. The qualifier is not checked.
fn snapshot_base(version: &str) -> Option<&str> {
    let (end, _) = version.char_indices().rev().nth(SNAPSHOT_QUALIFIER_CHARS - 1)?;
    Some(&version[..end])
}

fn suffix(mod_suffix: bool) -> &'static str {
    if mod_suffix {
        MOD_SUFFIX
    } else {
        ""
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SnapshotStamp<'a> {
    timestamp: &'a str,
    build_number: &'a str,
}

/// `None` when there is no `<snapshot>` or it carries no `<timestamp>`.
fn snapshot_stamp(metadata: &str) -> Result<Option<SnapshotStamp<'_>>, MetadataError> {
    let Some(snapshot) = metadata.find(SNAPSHOT_TAG) else {
        return Ok(None);
    };
    let Some(ts_tag) = find_from(metadata, TIMESTAMP_TAG, snapshot) else {
        return Ok(None);
    };

    let ts_start = ts_tag + TIMESTAMP_TAG.len();
    let timestamp = metadata
        .get(ts_start..ts_start + TIMESTAMP_LEN)
        .ok_or(MetadataError::TruncatedTimestamp)?;

    // Searched from the snapshot block, not from the timestamp.
    let bn_tag = find_from(metadata, BUILD_NUMBER_TAG, snapshot)
        .ok_or(MetadataError::MissingBuildNumber)?;
    let bn_start = bn_tag + BUILD_NUMBER_TAG.len();
    let bn_end = find_from(metadata, "<", bn_start - 1)
        .ok_or(MetadataError::UnterminatedBuildNumber)?;
    let build_number = metadata
        .get(bn_start..bn_end)
        .ok_or(MetadataError::UnterminatedBuildNumber)?;

    Ok(Some(SnapshotStamp {
        timestamp,
        build_number,
    }))
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|i| from + i)
}
