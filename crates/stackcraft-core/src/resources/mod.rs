//! Cloud resource inventory
//!
//! This module provides:
//! - The inventory data model ([`ProjectInventory`] and friends)
//! - Display masking for secret values
//! - Typed provider config files
//! - Resource discovery from a project directory
//! - The static deletion order, risk assessment and backup requirements

pub mod dependencies;
pub mod discovery;
pub mod mask;
pub mod provider;
pub mod types;

pub use discovery::{detect_database_kind, discover, ResourceDiscoverer};
pub use mask::mask;
pub use types::{
    BackupKind, BackupRequirement, BlobStoreResource, DatabaseKind, DatabaseResource,
    DatabaseResources, DeletionPriority, DependencyGraph, EnvVarDisplay, ProjectInventory,
    ResourceType, RiskAssessment, RiskFactor, RiskKind, RiskLevel, StorageResources,
    VercelResources,
};
