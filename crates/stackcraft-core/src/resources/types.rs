//! Discovered-resource data model

use super::mask::{serialize_masked, serialize_masked_opt};
use crate::env::EnvironmentKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of cleanable cloud entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    VercelProject,
    TursoDatabase,
    SupabaseProject,
    BlobStore,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::VercelProject,
        ResourceType::TursoDatabase,
        ResourceType::SupabaseProject,
        ResourceType::BlobStore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::VercelProject => "vercel-project",
            ResourceType::TursoDatabase => "turso-database",
            ResourceType::SupabaseProject => "supabase-project",
            ResourceType::BlobStore => "blob-store",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::VercelProject => "Vercel project",
            ResourceType::TursoDatabase => "Turso database",
            ResourceType::SupabaseProject => "Supabase project",
            ResourceType::BlobStore => "Vercel Blob store",
        }
    }

    /// Whether instances of this type are scoped to an environment tier
    pub fn is_environment_tiered(&self) -> bool {
        matches!(
            self,
            ResourceType::TursoDatabase | ResourceType::SupabaseProject
        )
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A variable listed for display; only the masked copy is kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarDisplay {
    pub key: String,
    pub masked_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelResources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    pub domains: Vec<String>,
    pub environment_variables: Vec<EnvVarDisplay>,
}

/// Database family; at most one per project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Turso,
    Supabase,
}

impl DatabaseKind {
    /// Resource type a database of this family is deleted as
    pub fn resource_type(&self) -> ResourceType {
        match self {
            DatabaseKind::Turso => ResourceType::TursoDatabase,
            DatabaseKind::Supabase => ResourceType::SupabaseProject,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseKind::Turso => "Turso",
            DatabaseKind::Supabase => "Supabase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseResource {
    pub environment: EnvironmentKey,
    pub identifier: String,
    pub url: String,
    #[serde(
        serialize_with = "serialize_masked_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseResources {
    #[serde(rename = "type")]
    pub kind: DatabaseKind,
    pub resources: Vec<DatabaseResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobStoreResource {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "serialize_masked")]
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResources {
    pub blob_stores: Vec<BlobStoreResource>,
}

/// Position of a resource type in the global deletion sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionPriority {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub priority: u32,
    pub dependencies: Vec<ResourceType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskKind {
    DataLoss,
    ServiceDisruption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub severity: RiskLevel,
    pub description: String,
    pub affected_resources: Vec<ResourceType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall: RiskLevel,
    pub factors: Vec<RiskFactor>,
    pub mitigations: Vec<String>,
}

impl RiskAssessment {
    /// Keep only the factors that affect at least one of `selected`
    pub fn for_selection(&self, selected: &[ResourceType]) -> RiskAssessment {
        RiskAssessment {
            overall: self.overall,
            factors: self
                .factors
                .iter()
                .filter(|f| f.affected_resources.iter().any(|r| selected.contains(r)))
                .cloned()
                .collect(),
            mitigations: self.mitigations.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    Configuration,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRequirement {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub kind: BackupKind,
    pub required: bool,
    /// Human estimate; `None` when unknown
    pub estimated_size: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    pub deletion_order: Vec<DeletionPriority>,
    pub risk_assessment: RiskAssessment,
    pub backup_requirements: Vec<BackupRequirement>,
}

impl DependencyGraph {
    /// Whether deleting this type needs a backup first
    pub fn requires_backup(&self, resource_type: ResourceType) -> bool {
        self.backup_requirements
            .iter()
            .any(|b| b.resource_type == resource_type && b.required)
    }
}

/// Read-only snapshot of one project's cloud resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInventory {
    pub project_name: String,
    pub project_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vercel: Option<VercelResources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<DatabaseResources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageResources>,
    pub dependencies: DependencyGraph,
}

impl ProjectInventory {
    /// Number of deletable instances of a resource type
    pub fn count(&self, resource_type: ResourceType) -> usize {
        match resource_type {
            ResourceType::VercelProject => self
                .vercel
                .as_ref()
                .map_or(0, |v| usize::from(v.project_id.is_some())),
            ResourceType::TursoDatabase | ResourceType::SupabaseProject => self
                .databases
                .as_ref()
                .filter(|db| db.kind.resource_type() == resource_type)
                .map_or(0, |db| db.resources.len()),
            ResourceType::BlobStore => self
                .storage
                .as_ref()
                .map_or(0, |s| s.blob_stores.len()),
        }
    }

    /// Resource types with at least one deletable instance, in enumeration order
    pub fn available_types(&self) -> Vec<ResourceType> {
        ResourceType::ALL
            .into_iter()
            .filter(|t| self.count(*t) > 0)
            .collect()
    }

    /// Database resources of `resource_type`, if the inventory holds that family
    pub fn databases_of(&self, resource_type: ResourceType) -> &[DatabaseResource] {
        match &self.databases {
            Some(db) if db.kind.resource_type() == resource_type => &db.resources,
            _ => &[],
        }
    }

    /// Plain-text summary, one line per resource
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(vercel) = &self.vercel {
            lines.push(format!(
                "Vercel project: {}",
                vercel.project_id.as_deref().unwrap_or("(not linked)")
            ));
            if let Some(org) = &vercel.org_id {
                lines.push(format!("  org: {}", org));
            }
            for domain in &vercel.domains {
                lines.push(format!("  domain: {}", domain));
            }
            lines.push(format!(
                "  environment variables: {}",
                vercel.environment_variables.len()
            ));
        }

        if let Some(db) = &self.databases {
            for resource in &db.resources {
                lines.push(format!(
                    "{} database [{}]: {} ({})",
                    db.kind.display_name(),
                    resource.environment,
                    resource.identifier,
                    resource.url
                ));
            }
        }

        if let Some(storage) = &self.storage {
            for store in &storage.blob_stores {
                lines.push(format!("Blob store: {} ({})", store.name, store.id));
            }
        }

        if lines.is_empty() {
            lines.push("No cloud resources found".to_string());
        }

        lines
    }
}
