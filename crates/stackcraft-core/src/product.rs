//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a binary implements to configure discovery
//! and cleanup for its own naming and file conventions.

use crate::config::FileLayout;
use std::path::{Path, PathBuf};

/// Configuration trait for CLI products
///
/// Each binary implements this trait to define:
/// - Product identity (display name, docs)
/// - Where the project directory comes from when not given explicitly
/// - Which files discovery reads
/// - Where backup destinations are rooted
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable name for overriding the project directory
    fn project_dir_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// File names read during discovery
    fn file_layout(&self) -> FileLayout {
        FileLayout::default()
    }

    /// Directory, relative to the project, under which backup destinations are placed
    fn backup_root(&self) -> &'static str {
        "backups"
    }

    /// Resolve the project directory: explicit path, then the override variable,
    /// then the current directory
    fn project_dir(&self, explicit: Option<&Path>) -> PathBuf {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let chosen = match explicit {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var(self.project_dir_env()) {
                Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
                _ => return current_dir,
            },
        };

        if chosen.is_absolute() {
            chosen
        } else {
            current_dir.join(chosen)
        }
    }
}
