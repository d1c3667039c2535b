//! File names read during discovery

use crate::env::EnvironmentKey;

/// Dotenv and provider files discovery looks for, relative to the project root
///
/// Within a tier, files are applied in list order, so a later file overrides an
/// earlier one on key collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLayout {
    /// Variables common to all environments
    pub shared: Vec<String>,

    /// Development tier candidates
    pub development: Vec<String>,

    /// Staging tier candidates
    pub staging: Vec<String>,

    /// Production tier candidates
    pub production: Vec<String>,

    /// Vercel project config (`projectId`, `orgId`, `alias`)
    pub provider_config: String,

    /// Vercel link file written by `vercel link`
    pub provider_link: String,

    /// Fallback list of domain strings
    pub domain_list: String,
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            shared: vec![".env".to_string()],
            development: vec![".env.development".to_string(), ".env.local".to_string()],
            staging: vec![".env.staging".to_string()],
            production: vec![
                ".env.production".to_string(),
                ".env.production.local".to_string(),
            ],
            provider_config: "vercel.json".to_string(),
            provider_link: ".vercel/project.json".to_string(),
            domain_list: "domains.json".to_string(),
        }
    }
}

impl FileLayout {
    /// Candidate files for one environment tier
    pub fn tier_files(&self, tier: EnvironmentKey) -> &[String] {
        match tier {
            EnvironmentKey::Development => &self.development,
            EnvironmentKey::Staging => &self.staging,
            EnvironmentKey::Production => &self.production,
        }
    }
}
