//! Error types for discovery and the confirmation gate

use std::path::PathBuf;
use thiserror::Error;

/// Fatal discovery failure. No partial inventory is produced.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Cannot derive a project name from '{}'", path.display())]
    ProjectName { path: PathBuf },
}

/// Failure of the prompt collaborator itself (not a rejection by the user)
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}
