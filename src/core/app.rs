//! Application identity from Cargo.toml.

/// Binary and package name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Organization used for platform directories.
pub const VENDOR: &str = "polymorphl";
