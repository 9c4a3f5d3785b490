//! CLI for fetching modules from a tray repository.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trayrepo_core::config::TrayConfig;
use trayrepo_core::ModuleIdentifier;

use commands::{run_fetch, run_key, run_resolve_name};

/// Top-level CLI for the tray repository resolver.
#[derive(Debug, Parser)]
#[command(name = "trayrepo")]
#[command(about = "Fetch Maven-layout modules from an S3 tray repository", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a module and download its artifact.
    Fetch {
        /// Module identifier: owner~name~version.
        module: ModuleIdentifier,
        /// Destination file (default: <name>-<version>.zip in the current directory).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Repository (bucket) id; overrides `repo_id` from the config file.
        #[arg(long, value_name = "ID")]
        repo: Option<String>,
        /// Fetch the `-mod` packaging of the artifact.
        #[arg(long)]
        mod_suffix: bool,
    },

    /// Print the storage key prefix of a module.
    Key {
        /// Module identifier: owner~name~version.
        module: ModuleIdentifier,
    },

    /// Print the artifact name a local maven-metadata.xml resolves to.
    ResolveName {
        /// Module identifier: owner~name~version.
        module: ModuleIdentifier,
        /// Path to the maven-metadata.xml file.
        metadata: PathBuf,
        /// Use the `-mod` packaging name.
        #[arg(long)]
        mod_suffix: bool,
    },
}

impl CliCommand {
    /// Parse arguments and run the command. `cfg` is only required by `fetch`.
    pub fn run_from_args(cfg: Result<TrayConfig>) -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch {
                module,
                output,
                repo,
                mod_suffix,
            } => {
                let cfg = cfg?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_fetch(&cfg, &module, output.as_deref(), repo.as_deref(), mod_suffix)?;
            }
            CliCommand::Key { module } => run_key(&module),
            CliCommand::ResolveName {
                module,
                metadata,
                mod_suffix,
            } => run_resolve_name(&module, &metadata, mod_suffix)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
