//! Resource discovery from dotenv files and provider config
//!
//! Discovery never calls a provider API. Everything is inferred from what the
//! project has on disk, and anything that cannot be inferred with confidence is
//! left out of the inventory rather than guessed.

use super::dependencies;
use super::mask::mask;
use super::provider::{read_json, Alias, VercelConfig};
use super::types::{
    BlobStoreResource, DatabaseKind, DatabaseResource, DatabaseResources, EnvVarDisplay,
    ProjectInventory, StorageResources, VercelResources,
};
use crate::config::FileLayout;
use crate::env::{read_environment_map, EnvironmentKey, EnvironmentMap};
use crate::error::DiscoveryError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use url::Url;

/// Explicit database family selection
const DATABASE_PROVIDER_VAR: &str = "DATABASE_PROVIDER";

const VERCEL_NAMESPACE: &str = "VERCEL_";
const VERCEL_PROJECT_ID_VAR: &str = "VERCEL_PROJECT_ID";
const VERCEL_ORG_ID_VAR: &str = "VERCEL_ORG_ID";

const BLOB_ID_VARS: &[&str] = &["BLOB_STORE_ID"];
const BLOB_NAME_VARS: &[&str] = &["BLOB_STORE_NAME"];
const BLOB_TOKEN_VARS: &[&str] = &["BLOB_READ_WRITE_TOKEN"];
const BLOB_TOKEN_PREFIX: &str = "vercel_blob_rw_";

/// Variable names for one database family
struct DatabaseVars {
    /// Any key with one of these prefixes signals the family
    prefixes: &'static [&'static str],
    url: &'static [&'static str],
    token: &'static [&'static str],
    name: &'static [&'static str],
}

const TURSO_VARS: DatabaseVars = DatabaseVars {
    prefixes: &["TURSO_"],
    url: &["TURSO_DATABASE_URL"],
    token: &["TURSO_AUTH_TOKEN"],
    name: &["TURSO_DATABASE_NAME"],
};

const SUPABASE_VARS: DatabaseVars = DatabaseVars {
    prefixes: &["SUPABASE_", "NEXT_PUBLIC_SUPABASE_", "EXPO_PUBLIC_SUPABASE_"],
    url: &[
        "SUPABASE_URL",
        "NEXT_PUBLIC_SUPABASE_URL",
        "EXPO_PUBLIC_SUPABASE_URL",
    ],
    token: &[
        "SUPABASE_SERVICE_ROLE_KEY",
        "SUPABASE_ANON_KEY",
        "NEXT_PUBLIC_SUPABASE_ANON_KEY",
        "EXPO_PUBLIC_SUPABASE_ANON_KEY",
    ],
    name: &["SUPABASE_PROJECT_REF", "SUPABASE_PROJECT_ID"],
};

fn vars_for(kind: DatabaseKind) -> &'static DatabaseVars {
    match kind {
        DatabaseKind::Turso => &TURSO_VARS,
        DatabaseKind::Supabase => &SUPABASE_VARS,
    }
}

/// Builds a [`ProjectInventory`] for a local project directory
#[derive(Debug, Clone, Default)]
pub struct ResourceDiscoverer {
    layout: FileLayout,
}

impl ResourceDiscoverer {
    pub fn new(layout: FileLayout) -> Self {
        Self { layout }
    }

    /// Discover the resources of the project at `project_path`
    ///
    /// Re-reads everything from disk on each call. Fails only when no project
    /// name can be derived from the path.
    #[tracing::instrument(skip(self))]
    pub async fn discover(&self, project_path: &Path) -> Result<ProjectInventory, DiscoveryError> {
        let (project_name, project_path) = resolve_project(project_path).await?;

        let env = read_environment_map(&project_path, &self.layout).await;
        debug!(variables = env.combined().len(), "Environment map loaded");

        let vercel = self.discover_vercel(&project_path, &env).await;

        let databases = detect_database_kind(&env).and_then(|kind| {
            let resources = extract_databases(kind, &env);
            if resources.is_empty() {
                debug!(kind = kind.display_name(), "Database family detected but no URLs found");
                None
            } else {
                Some(DatabaseResources { kind, resources })
            }
        });

        let blob_stores = extract_blob_stores(&env);
        let storage = (!blob_stores.is_empty()).then_some(StorageResources { blob_stores });

        Ok(ProjectInventory {
            project_name,
            project_path: project_path.display().to_string(),
            vercel,
            databases,
            storage,
            dependencies: dependencies::analyze(),
        })
    }

    async fn discover_vercel(&self, root: &Path, env: &EnvironmentMap) -> Option<VercelResources> {
        let link: VercelConfig = read_json(&root.join(&self.layout.provider_link))
            .await
            .unwrap_or_default();
        let config: VercelConfig = read_json(&root.join(&self.layout.provider_config))
            .await
            .unwrap_or_default();
        let from_env = VercelConfig {
            project_id: env.get(VERCEL_PROJECT_ID_VAR).map(str::to_string),
            org_id: env.get(VERCEL_ORG_ID_VAR).map(str::to_string),
            alias: None,
        };

        let merged = link.or(config).or(from_env);

        if merged.project_id.is_none() && !env.has_prefix(&[VERCEL_NAMESPACE]) {
            return None;
        }

        let mut domains = merged
            .alias
            .map(Alias::into_domains)
            .unwrap_or_default();
        if domains.is_empty() {
            let listed: Vec<String> = read_json(&root.join(&self.layout.domain_list))
                .await
                .unwrap_or_default();
            domains = Alias::Many(listed).into_domains();
        }

        let environment_variables = env
            .combined()
            .iter()
            .filter(|(key, _)| key.starts_with(VERCEL_NAMESPACE))
            .map(|(key, value)| EnvVarDisplay {
                key: key.clone(),
                masked_value: mask(value),
            })
            .collect();

        Some(VercelResources {
            project_id: merged.project_id,
            org_id: merged.org_id,
            domains,
            environment_variables,
        })
    }
}

/// Discover with the default file layout
pub async fn discover(project_path: &Path) -> Result<ProjectInventory, DiscoveryError> {
    ResourceDiscoverer::default().discover(project_path).await
}

/// Resolve the path and take its basename as the project name
async fn resolve_project(path: &Path) -> Result<(String, PathBuf), DiscoveryError> {
    let resolved = fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf());

    let name = resolved
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DiscoveryError::ProjectName {
            path: path.to_path_buf(),
        })?;

    Ok((name, resolved))
}

/// Pick the database family
///
/// `DATABASE_PROVIDER` wins. Otherwise the family is inferred from variable
/// prefixes, checking Turso before Supabase; when both are present Turso is kept
/// and the ambiguity is reported.
pub fn detect_database_kind(env: &EnvironmentMap) -> Option<DatabaseKind> {
    if let Some(explicit) = env.get(DATABASE_PROVIDER_VAR) {
        match explicit.trim().to_ascii_lowercase().as_str() {
            "turso" => return Some(DatabaseKind::Turso),
            "supabase" => return Some(DatabaseKind::Supabase),
            other => warn!(
                value = other,
                "Unknown {}, inferring database from variables", DATABASE_PROVIDER_VAR
            ),
        }
    }

    let turso = env.has_prefix(TURSO_VARS.prefixes);
    let supabase = env.has_prefix(SUPABASE_VARS.prefixes);

    match (turso, supabase) {
        (true, true) => {
            warn!(
                "Both Turso and Supabase variables found; using Turso. Set {} to choose explicitly",
                DATABASE_PROVIDER_VAR
            );
            Some(DatabaseKind::Turso)
        }
        (true, false) => Some(DatabaseKind::Turso),
        (false, true) => Some(DatabaseKind::Supabase),
        (false, false) => None,
    }
}

/// One resource per tier that has a URL
///
/// A URL resolved through the shared `.env` fallback is reported for every tier
/// that sees it. The plan builder collapses tiers sharing one database.
fn extract_databases(kind: DatabaseKind, env: &EnvironmentMap) -> Vec<DatabaseResource> {
    let vars = vars_for(kind);
    let mut resources: Vec<DatabaseResource> = Vec::new();

    for tier in EnvironmentKey::ALL {
        let Some(url) = env.lookup_scoped(tier, vars.url) else {
            debug!(%tier, "No database URL");
            continue;
        };

        let identifier = env
            .lookup_scoped(tier, vars.name)
            .map(str::to_string)
            .or_else(|| identifier_from_url(url));

        let Some(identifier) = identifier else {
            warn!(%tier, url = %mask(url), "Cannot derive a database identifier, skipping");
            continue;
        };

        resources.push(DatabaseResource {
            environment: tier,
            identifier,
            url: url.to_string(),
            token: env.lookup_scoped(tier, vars.token).map(str::to_string),
        });
    }

    resources
}

/// First DNS label of the URL host: `libsql://acme-prod.turso.io` → `acme-prod`
fn identifier_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.host_str()?
        .split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

/// Blob stores across tiers, first occurrence of each store id wins
fn extract_blob_stores(env: &EnvironmentMap) -> Vec<BlobStoreResource> {
    let mut stores: Vec<BlobStoreResource> = Vec::new();

    for tier in EnvironmentKey::ALL {
        let Some(token) = env.lookup_scoped(tier, BLOB_TOKEN_VARS) else {
            continue;
        };

        let id = env
            .lookup_scoped(tier, BLOB_ID_VARS)
            .map(str::to_string)
            .or_else(|| store_id_from_token(token));

        let Some(id) = id else {
            warn!(%tier, "Blob token found without a store id, skipping");
            continue;
        };

        if stores.iter().any(|s| s.id == id) {
            continue;
        }

        let name = env
            .lookup_scoped(tier, BLOB_NAME_VARS)
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());

        stores.push(BlobStoreResource {
            id,
            name,
            token: token.to_string(),
        });
    }

    stores
}

/// `vercel_blob_rw_<storeId>_<secret>` → `storeId`
fn store_id_from_token(token: &str) -> Option<String> {
    token
        .strip_prefix(BLOB_TOKEN_PREFIX)?
        .split('_')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::types::ResourceType;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("acme");
        std_fs::create_dir_all(&root).unwrap();
        for (name, content) in files {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                std_fs::create_dir_all(parent).unwrap();
            }
            std_fs::write(path, content).unwrap();
        }
        (dir, root)
    }

    #[tokio::test]
    async fn test_root_path_has_no_project_name() {
        let result = discover(Path::new("/")).await;
        assert!(matches!(result, Err(DiscoveryError::ProjectName { .. })));
    }

    #[tokio::test]
    async fn test_empty_project_has_no_resources() {
        let (_dir, root) = project(&[]);
        let inventory = discover(&root).await.unwrap();

        assert_eq!(inventory.project_name, "acme");
        assert!(inventory.vercel.is_none());
        assert!(inventory.databases.is_none());
        assert!(inventory.storage.is_none());
        assert_eq!(inventory.dependencies.deletion_order.len(), 4);
    }

    #[tokio::test]
    async fn test_vercel_link_file_and_alias() {
        let (_dir, root) = project(&[
            (".vercel/project.json", r#"{"projectId": "prj_link", "orgId": "team_1"}"#),
            ("vercel.json", r#"{"projectId": "prj_config", "alias": ["acme.dev"]}"#),
            ("domains.json", r#"["ignored.dev"]"#),
        ]);
        let vercel = discover(&root).await.unwrap().vercel.unwrap();

        assert_eq!(vercel.project_id.as_deref(), Some("prj_link"));
        assert_eq!(vercel.org_id.as_deref(), Some("team_1"));
        assert_eq!(vercel.domains, vec!["acme.dev"]);
    }

    #[tokio::test]
    async fn test_domains_fall_back_to_domain_list() {
        let (_dir, root) = project(&[
            ("vercel.json", r#"{"projectId": "prj_1"}"#),
            ("domains.json", r#"["acme.dev", "www.acme.dev"]"#),
        ]);
        let vercel = discover(&root).await.unwrap().vercel.unwrap();
        assert_eq!(vercel.domains, vec!["acme.dev", "www.acme.dev"]);
    }

    #[tokio::test]
    async fn test_malformed_provider_config_falls_back_to_env() {
        let (_dir, root) = project(&[
            ("vercel.json", "{ broken"),
            (".env", "VERCEL_PROJECT_ID=prj_env\n"),
        ]);
        let vercel = discover(&root).await.unwrap().vercel.unwrap();
        assert_eq!(vercel.project_id.as_deref(), Some("prj_env"));
        assert!(vercel.domains.is_empty());
    }

    #[tokio::test]
    async fn test_namespaced_vars_alone_emit_vercel_block() {
        let (_dir, root) = project(&[(
            ".env",
            "VERCEL_URL=acme.vercel.app\nVERCEL_TOKEN=abcdefghijkl\nSECRET=abcdefghijkl\nTURSO_AUTH_TOKEN=tok_abcdefgh1234\n",
        )]);
        let inventory = discover(&root).await.unwrap();
        let vercel = inventory.vercel.as_ref().unwrap();

        assert!(vercel.project_id.is_none());
        assert_eq!(inventory.count(ResourceType::VercelProject), 0);
        let keys: Vec<&str> = vercel
            .environment_variables
            .iter()
            .map(|v| v.key.as_str())
            .collect();
        assert_eq!(keys, vec!["VERCEL_TOKEN", "VERCEL_URL"]);
        assert_eq!(vercel.environment_variables[0].masked_value, "abcd****ijkl");
    }

    #[tokio::test]
    async fn test_turso_per_tier_with_suffixes() {
        let (_dir, root) = project(&[
            (
                ".env",
                "TURSO_DATABASE_URL_PROD=libsql://acme-prod.turso.io\nTURSO_AUTH_TOKEN_PROD=tok_abcdefgh1234\n",
            ),
            (".env.development", "TURSO_DATABASE_URL=libsql://acme-dev.turso.io\n"),
        ]);
        let db = discover(&root).await.unwrap().databases.unwrap();

        assert_eq!(db.kind, DatabaseKind::Turso);
        assert_eq!(db.resources.len(), 2);
        assert_eq!(db.resources[0].environment, EnvironmentKey::Development);
        assert_eq!(db.resources[0].identifier, "acme-dev");
        assert!(db.resources[0].token.is_none());
        assert_eq!(db.resources[1].environment, EnvironmentKey::Production);
        assert_eq!(db.resources[1].identifier, "acme-prod");
        assert_eq!(db.resources[1].token.as_deref(), Some("tok_abcdefgh1234"));
    }

    #[tokio::test]
    async fn test_shared_url_is_reported_for_every_tier() {
        let (_dir, root) = project(&[(".env", "TURSO_DATABASE_URL=libsql://acme.turso.io\n")]);
        let db = discover(&root).await.unwrap().databases.unwrap();

        let tiers: Vec<EnvironmentKey> = db.resources.iter().map(|r| r.environment).collect();
        assert_eq!(tiers, EnvironmentKey::ALL.to_vec());
        assert!(db
            .resources
            .iter()
            .all(|r| r.identifier == "acme" && r.url == "libsql://acme.turso.io"));
    }

    #[tokio::test]
    async fn test_tier_file_overrides_shared_url_for_that_tier_only() {
        let (_dir, root) = project(&[
            (".env", "TURSO_DATABASE_URL=libsql://acme.turso.io\n"),
            (".env.production", "TURSO_DATABASE_URL=libsql://acme-prod.turso.io\n"),
        ]);
        let db = discover(&root).await.unwrap().databases.unwrap();

        let found: Vec<(EnvironmentKey, &str)> = db
            .resources
            .iter()
            .map(|r| (r.environment, r.identifier.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (EnvironmentKey::Development, "acme"),
                (EnvironmentKey::Staging, "acme"),
                (EnvironmentKey::Production, "acme-prod"),
            ]
        );
    }

    #[tokio::test]
    async fn test_supabase_from_public_prefix() {
        let (_dir, root) = project(&[(
            ".env.production",
            "NEXT_PUBLIC_SUPABASE_URL=https://abcdxyz.supabase.co\nNEXT_PUBLIC_SUPABASE_ANON_KEY=anon\n",
        )]);
        let db = discover(&root).await.unwrap().databases.unwrap();

        assert_eq!(db.kind, DatabaseKind::Supabase);
        assert_eq!(db.resources.len(), 1);
        assert_eq!(db.resources[0].environment, EnvironmentKey::Production);
        assert_eq!(db.resources[0].identifier, "abcdxyz");
    }

    #[tokio::test]
    async fn test_turso_wins_when_both_families_present() {
        let (_dir, root) = project(&[(
            ".env",
            "TURSO_DATABASE_URL=libsql://a.turso.io\nSUPABASE_URL=https://b.supabase.co\n",
        )]);
        let db = discover(&root).await.unwrap().databases.unwrap();
        assert_eq!(db.kind, DatabaseKind::Turso);
    }

    #[tokio::test]
    async fn test_explicit_provider_overrides_inference() {
        let (_dir, root) = project(&[(
            ".env",
            "DATABASE_PROVIDER=Supabase\nTURSO_DATABASE_URL=libsql://a.turso.io\nSUPABASE_URL=https://b.supabase.co\n",
        )]);
        let db = discover(&root).await.unwrap().databases.unwrap();
        assert_eq!(db.kind, DatabaseKind::Supabase);
        assert_eq!(db.resources[0].identifier, "b");
    }

    #[tokio::test]
    async fn test_explicit_database_name_wins_over_url() {
        let (_dir, root) = project(&[(
            ".env.staging",
            "TURSO_DATABASE_URL=libsql://acme-staging-org.turso.io\nTURSO_DATABASE_NAME=acme-staging\n",
        )]);
        let db = discover(&root).await.unwrap().databases.unwrap();
        assert_eq!(db.resources[0].identifier, "acme-staging");
    }

    #[tokio::test]
    async fn test_local_database_url_is_skipped() {
        let (_dir, root) = project(&[(".env", "TURSO_DATABASE_URL=file:local.db\n")]);
        assert!(discover(&root).await.unwrap().databases.is_none());
    }

    #[tokio::test]
    async fn test_blob_stores_deduplicated_by_id() {
        let (_dir, root) = project(&[
            (".env", "BLOB_READ_WRITE_TOKEN=vercel_blob_rw_store1_secretsecret\n"),
            (
                ".env.production",
                "BLOB_READ_WRITE_TOKEN_PROD=vercel_blob_rw_store2_othersecret\nBLOB_STORE_NAME_PROD=prod-assets\n",
            ),
        ]);
        let storage = discover(&root).await.unwrap().storage.unwrap();

        let ids: Vec<&str> = storage.blob_stores.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["store1", "store2"]);
        assert_eq!(storage.blob_stores[0].name, "store1");
        assert_eq!(storage.blob_stores[1].name, "prod-assets");
        assert_eq!(
            storage.blob_stores[0].token,
            "vercel_blob_rw_store1_secretsecret"
        );
    }

    #[tokio::test]
    async fn test_discovery_is_idempotent() {
        let (_dir, root) = project(&[
            (".env", "TURSO_DATABASE_URL=libsql://acme.turso.io\nVERCEL_PROJECT_ID=prj_1\n"),
            ("vercel.json", r#"{"alias": "acme.dev"}"#),
        ]);
        let first = discover(&root).await.unwrap();
        let second = discover(&root).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_serialized_inventory_masks_tokens() {
        let (_dir, root) = project(&[(
            ".env",
            "TURSO_DATABASE_URL=libsql://acme.turso.io\nTURSO_AUTH_TOKEN=tok_abcdefgh1234\n",
        )]);
        let inventory = discover(&root).await.unwrap();
        let json = serde_json::to_string(&inventory).unwrap();

        assert!(!json.contains("tok_abcdefgh1234"));
        assert!(json.contains("tok_********1234"));
        assert!(json.contains(r#""type":"turso""#));
    }

    #[test]
    fn test_store_id_from_token() {
        assert_eq!(
            store_id_from_token("vercel_blob_rw_AbC123_xyz").as_deref(),
            Some("AbC123")
        );
        assert!(store_id_from_token("something_else").is_none());
        assert!(store_id_from_token("vercel_blob_rw__xyz").is_none());
    }
}
