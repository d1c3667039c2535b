//! Environment variable files per deployment tier
//!
//! This module provides:
//! - The deployment tiers (`development`, `staging`, `production`)
//! - A permissive dotenv parser
//! - The layered [`EnvironmentMap`] and its reader

pub mod dotenv;
pub mod map;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use map::{read_environment_map, EnvironmentMap};

/// A deployment stage scoping a resource instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKey {
    Development,
    Staging,
    Production,
}

impl EnvironmentKey {
    /// All tiers in merge order
    pub const ALL: [EnvironmentKey; 3] = [
        EnvironmentKey::Development,
        EnvironmentKey::Staging,
        EnvironmentKey::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentKey::Development => "development",
            EnvironmentKey::Staging => "staging",
            EnvironmentKey::Production => "production",
        }
    }

    /// Variable name suffixes that scope a key to this tier, most specific first
    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            EnvironmentKey::Development => &["_DEV", "_DEVELOPMENT"],
            EnvironmentKey::Staging => &["_STAGING", "_STG"],
            EnvironmentKey::Production => &["_PROD", "_PRODUCTION"],
        }
    }
}

impl fmt::Display for EnvironmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
