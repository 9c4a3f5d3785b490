//! `trayrepo fetch <module>` – resolve a module and download its artifact.

use anyhow::Result;
use std::path::{Path, PathBuf};
use trayrepo_core::config::{self, TrayConfig};
use trayrepo_core::metadata::plain_artifact_name;
use trayrepo_core::{ModuleIdentifier, RepoResolver, TrayRepoResolver};

pub fn run_fetch(
    cfg: &TrayConfig,
    module: &ModuleIdentifier,
    output: Option<&Path>,
    repo: Option<&str>,
    mod_suffix: bool,
) -> Result<()> {
    let repo_id = match repo.or(cfg.repo_id.as_deref()) {
        Some(id) => id,
        None => anyhow::bail!(
            "no repository id: pass --repo or set repo_id in {}",
            config::config_path()?.display()
        ),
    };
    let dest: PathBuf = match output {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?.join(plain_artifact_name(module, mod_suffix)),
    };

    let resolver = TrayRepoResolver::from_config(cfg, repo_id).with_mod_suffix(mod_suffix);
    if !resolver.get_module(&dest, module) {
        anyhow::bail!("module {} not resolved from {}", module, repo_id);
    }
    println!("Fetched {} to {}", module, dest.display());
    Ok(())
}
