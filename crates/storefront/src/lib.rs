//! Storefront command-line wiring: configuration, catalog loading and the
//! JSON-producing commands behind the `storefront` binary.

pub mod commands;
pub mod config;

pub use commands::{Cli, Command, run};
pub use config::{ConfigError, StorefrontConfig};
