//! `trayrepo key <module>` – print the storage key prefix.

use trayrepo_core::ModuleIdentifier;

pub fn run_key(module: &ModuleIdentifier) {
    println!("{}", module.storage_key());
}
