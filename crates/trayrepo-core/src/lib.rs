pub mod config;
pub mod logging;

pub mod credentials;
pub mod error;
pub mod metadata;
pub mod module_id;
pub mod resolver;
pub mod retrieve;
pub mod s3;
pub mod storage;
pub mod store;

pub use error::{ErrorKind, ResolveError};
pub use module_id::ModuleIdentifier;
pub use resolver::{RepoResolver, TrayRepoResolver};
