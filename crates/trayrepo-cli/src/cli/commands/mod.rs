//! CLI command handlers. Each command is in its own file.

mod fetch;
mod key;
mod resolve_name;

pub use fetch::run_fetch;
pub use key::run_key;
pub use resolve_name::run_resolve_name;
