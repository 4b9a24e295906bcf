//! Application layer logic for commit-version.
//!
//! This crate loads project configuration and wires the version resolver to
//! the configured history and manifest backends.

pub mod config;
pub mod service;

// Re-exports for convenience
pub use config::{ConfigOverrides, InspectorBackend, ManifestFormat, ProjectConfig};
pub use service::{Inspector, StampOutcome, VersionService};
