//! Core types and configuration for bundlescan.
//!
//! This crate defines the build requirement value types
//! ([`BuildRequirements`]), the `bundlescan.toml` schema ([`ScanConfig`]),
//! and shared error types.

pub mod config;
pub mod error;
pub mod requirements;

pub use config::{
    CONFIG_FILE_NAME, DEFAULT_IGNORED_DIRS, DiscoverConfig, RuntimeConfig, ScanConfig,
};
pub use error::{Error, Result};
pub use requirements::{BuildBase, BuildKind, BuildRequirements, EnvVarValue};
