//! Layered environment map built from a project's dotenv files

use super::{dotenv, EnvironmentKey};
use crate::config::FileLayout;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// One file layer: variable name to value
pub type Layer = BTreeMap<String, String>;

/// Shared variables, one layer per tier, and their flattened merge
///
/// `combined` is always shared → development → staging → production with the
/// later layer winning, so it is computed on construction and never stored apart
/// from its layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    shared: Layer,
    by_environment: BTreeMap<EnvironmentKey, Layer>,
    combined: Layer,
}

impl EnvironmentMap {
    /// Build the map from its layers
    pub fn from_layers(shared: Layer, by_environment: BTreeMap<EnvironmentKey, Layer>) -> Self {
        let mut combined = shared.clone();
        for tier in EnvironmentKey::ALL {
            if let Some(layer) = by_environment.get(&tier) {
                combined.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        Self {
            shared,
            by_environment,
            combined,
        }
    }

    pub fn shared(&self) -> &Layer {
        &self.shared
    }

    /// Variables read for one tier (without the shared layer)
    pub fn tier(&self, tier: EnvironmentKey) -> Option<&Layer> {
        self.by_environment.get(&tier)
    }

    pub fn combined(&self) -> &Layer {
        &self.combined
    }

    /// Whether any variable anywhere starts with one of the prefixes
    pub fn has_prefix(&self, prefixes: &[&str]) -> bool {
        self.combined
            .keys()
            .any(|key| prefixes.iter().any(|prefix| key.starts_with(prefix)))
    }

    /// Non-empty value from the combined view
    pub fn get(&self, key: &str) -> Option<&str> {
        self.combined
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Look up the first non-empty value for a tier
    ///
    /// Names are tried in order. For each name the tier-suffixed variants
    /// (e.g. `TURSO_DATABASE_URL_PROD`) come before the bare key. The tier's own
    /// layer is searched first, then the shared layer.
    pub fn lookup_scoped(&self, tier: EnvironmentKey, names: &[&str]) -> Option<&str> {
        let layers = [self.by_environment.get(&tier), Some(&self.shared)];

        layers.into_iter().flatten().find_map(|layer| {
            names.iter().find_map(|name| {
                tier.suffixes()
                    .iter()
                    .map(|suffix| format!("{}{}", name, suffix))
                    .chain(std::iter::once(name.to_string()))
                    .find_map(|candidate| {
                        layer
                            .get(&candidate)
                            .map(String::as_str)
                            .filter(|value| !value.is_empty())
                    })
            })
        })
    }
}

/// Read every dotenv file of the layout under `project_path`
///
/// Missing files are silently empty. Any other read failure is logged and the
/// file treated as empty; reading never fails as a whole. Tiers are read
/// concurrently and merged by fixed precedence afterwards.
pub async fn read_environment_map(project_path: &Path, layout: &FileLayout) -> EnvironmentMap {
    let (shared, development, staging, production) = tokio::join!(
        read_layer(project_path, &layout.shared),
        read_layer(project_path, layout.tier_files(EnvironmentKey::Development)),
        read_layer(project_path, layout.tier_files(EnvironmentKey::Staging)),
        read_layer(project_path, layout.tier_files(EnvironmentKey::Production)),
    );

    let by_environment = BTreeMap::from([
        (EnvironmentKey::Development, development),
        (EnvironmentKey::Staging, staging),
        (EnvironmentKey::Production, production),
    ]);

    EnvironmentMap::from_layers(shared, by_environment)
}

async fn read_layer(project_path: &Path, files: &[String]) -> Layer {
    let mut layer = Layer::new();
    for file in files {
        layer.extend(read_env_file(&project_path.join(file)).await);
    }
    layer
}

async fn read_env_file(path: &Path) -> Vec<(String, String)> {
    match fs::read_to_string(path).await {
        Ok(content) => {
            let pairs = dotenv::parse(&content);
            debug!(path = %path.display(), variables = pairs.len(), "Loaded environment file");
            pairs
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read environment file, treating it as empty");
            Vec::new()
        }
    }
}
