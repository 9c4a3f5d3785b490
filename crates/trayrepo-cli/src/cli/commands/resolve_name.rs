//! `trayrepo resolve-name <module> <metadata>` – resolve an artifact name offline.

use anyhow::{Context, Result};
use std::path::Path;
use trayrepo_core::metadata::resolve_artifact_name;
use trayrepo_core::ModuleIdentifier;

pub fn run_resolve_name(module: &ModuleIdentifier, metadata: &Path, mod_suffix: bool) -> Result<()> {
    let xml = std::fs::read_to_string(metadata)
        .with_context(|| format!("read metadata file: {}", metadata.display()))?;
    let name = resolve_artifact_name(&xml, module, mod_suffix)
        .with_context(|| format!("resolve artifact name from {}", metadata.display()))?;
    println!("{}{}", module.storage_key(), name);
    Ok(())
}
