//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod manifest;
pub mod report;

pub use config::{InstallLayout, ProvisionerConfig, resolve_manifest_path};
pub use error::ProvisionError;
pub use manifest::{ArtifactSpec, DestinationPath, Manifest, PluginSpec, Revision};
pub use report::{
    ArtifactReport, ArtifactStatus, DestinationAction, DestinationReport, ProvisionReport,
    RepoAction, RepoReport,
};
