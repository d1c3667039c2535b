//! Typed Vercel provider config files

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::warn;

/// Fields discovery reads from `vercel.json` or `.vercel/project.json`
///
/// Unknown fields are ignored; everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelConfig {
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub org_id: Option<String>,

    #[serde(default)]
    pub alias: Option<Alias>,
}

/// `alias` may be a single domain or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Alias {
    One(String),
    Many(Vec<String>),
}

impl Alias {
    pub fn into_domains(self) -> Vec<String> {
        let domains = match self {
            Alias::One(domain) => vec![domain],
            Alias::Many(domains) => domains,
        };
        domains
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect()
    }
}

impl VercelConfig {
    /// Layer `fallback` under `self`: fields set here win
    pub fn or(self, fallback: VercelConfig) -> VercelConfig {
        VercelConfig {
            project_id: non_empty(self.project_id).or(non_empty(fallback.project_id)),
            org_id: non_empty(self.org_id).or(non_empty(fallback.org_id)),
            alias: self.alias.or(fallback.alias),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read and parse an optional JSON file
///
/// A missing file is `None` without comment. Unreadable or malformed files are
/// logged and also yield `None`, so discovery carries on with less information.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read provider config, ignoring it");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed provider config, ignoring it");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_accepts_string_or_list() {
        let one: VercelConfig = serde_json::from_str(r#"{"alias": "acme.dev"}"#).unwrap();
        assert_eq!(one.alias.unwrap().into_domains(), vec!["acme.dev"]);

        let many: VercelConfig =
            serde_json::from_str(r#"{"alias": ["acme.dev", " ", "www.acme.dev"]}"#).unwrap();
        assert_eq!(
            many.alias.unwrap().into_domains(),
            vec!["acme.dev", "www.acme.dev"]
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config: VercelConfig = serde_json::from_str(
            r#"{"projectId": "prj_1", "framework": "nextjs", "rewrites": []}"#,
        )
        .unwrap();
        assert_eq!(config.project_id.as_deref(), Some("prj_1"));
        assert!(config.alias.is_none());
    }

    #[test]
    fn test_or_prefers_self() {
        let link = VercelConfig {
            project_id: Some("prj_link".to_string()),
            org_id: Some(String::new()),
            alias: None,
        };
        let config = VercelConfig {
            project_id: Some("prj_config".to_string()),
            org_id: Some("team_1".to_string()),
            alias: Some(Alias::One("acme.dev".to_string())),
        };

        let merged = link.or(config);
        assert_eq!(merged.project_id.as_deref(), Some("prj_link"));
        assert_eq!(merged.org_id.as_deref(), Some("team_1"));
        assert!(merged.alias.is_some());
    }

    #[tokio::test]
    async fn test_read_json_malformed_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vercel.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(read_json::<VercelConfig>(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_read_json_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_json::<VercelConfig>(&dir.path().join("nope.json"))
            .await
            .is_none());
    }
}
