//! Cleanup plan building
//!
//! A plan is an ordered list of deletion steps for the resource types the user
//! selected. Steps follow the inventory's deletion order, and `order` counts
//! across the whole plan, so it doubles as the execution sequence.

use crate::env::EnvironmentKey;
use crate::resources::{DatabaseResource, ProjectInventory, ResourceType, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Fixed time budget per deletion step, in seconds
pub const SECONDS_PER_STEP: u64 = 30;

/// Which environment tiers a cleanup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupScope {
    Development,
    Staging,
    Production,
    All,
}

impl CleanupScope {
    pub fn environments(&self) -> Vec<EnvironmentKey> {
        match self {
            CleanupScope::Development => vec![EnvironmentKey::Development],
            CleanupScope::Staging => vec![EnvironmentKey::Staging],
            CleanupScope::Production => vec![EnvironmentKey::Production],
            CleanupScope::All => EnvironmentKey::ALL.to_vec(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CleanupScope::Development => "Development only",
            CleanupScope::Staging => "Staging only",
            CleanupScope::Production => "Production only",
            CleanupScope::All => "All environments",
        }
    }
}

impl From<EnvironmentKey> for CleanupScope {
    fn from(tier: EnvironmentKey) -> Self {
        match tier {
            EnvironmentKey::Development => CleanupScope::Development,
            EnvironmentKey::Staging => CleanupScope::Staging,
            EnvironmentKey::Production => CleanupScope::Production,
        }
    }
}

impl fmt::Display for CleanupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CleanupScope::Development => "development",
            CleanupScope::Staging => "staging",
            CleanupScope::Production => "production",
            CleanupScope::All => "all",
        };
        write!(f, "{}", s)
    }
}

/// What the user chose to delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSelection {
    pub selected_types: Vec<ResourceType>,
    pub scope: CleanupScope,
    pub environments: Vec<EnvironmentKey>,
    pub excluded_resources: Vec<String>,
}

impl ResourceSelection {
    /// Selection whose environments follow from the scope
    pub fn new(selected_types: Vec<ResourceType>, scope: CleanupScope) -> Self {
        Self {
            selected_types,
            scope,
            environments: scope.environments(),
            excluded_resources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionStep {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub description: String,
    pub parameters: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentKey>,
    /// 1-based position in the whole plan
    pub order: u32,
    pub requires_backup: bool,
    /// Ids of earlier steps this one must wait for
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub identifier: String,
    pub path: PathBuf,
}

/// Where backups go; capturing them is the executor's job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPlan {
    pub entries: Vec<BackupEntry>,
    pub estimated_size_bytes: u64,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPlan {
    pub project_name: String,
    pub steps: Vec<DeletionStep>,
    pub target_resources: ResourceSelection,
    pub backup_plan: BackupPlan,
    /// Seconds
    pub estimated_duration: u64,
    pub risk_level: RiskLevel,
}

impl CleanupPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A step before it gets its position in the plan
struct StepDraft {
    id: String,
    description: String,
    parameters: BTreeMap<String, String>,
    environment: Option<EnvironmentKey>,
}

/// Builds plans, placing backup destinations under `backup_root`
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    backup_root: PathBuf,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new("backups")
    }
}

impl PlanBuilder {
    /// `backup_root` is relative to the project directory unless absolute
    pub fn new(backup_root: impl Into<PathBuf>) -> Self {
        Self {
            backup_root: backup_root.into(),
        }
    }

    pub fn build(&self, inventory: &ProjectInventory, selection: &ResourceSelection) -> CleanupPlan {
        self.build_at(inventory, selection, Utc::now())
    }

    /// Build with an explicit timestamp for the backup destination
    pub fn build_at(
        &self,
        inventory: &ProjectInventory,
        selection: &ResourceSelection,
        now: DateTime<Utc>,
    ) -> CleanupPlan {
        let graph = &inventory.dependencies;
        let mut steps: Vec<DeletionStep> = Vec::new();

        for priority in &graph.deletion_order {
            let resource_type = priority.resource_type;
            if !selection.selected_types.contains(&resource_type) {
                continue;
            }

            let drafts = match resource_type {
                ResourceType::VercelProject => vercel_steps(inventory),
                ResourceType::TursoDatabase | ResourceType::SupabaseProject => {
                    database_steps(inventory, resource_type, &selection.environments)
                }
                ResourceType::BlobStore => blob_steps(inventory),
            };

            let depends_on: Vec<String> = steps
                .iter()
                .filter(|s| priority.dependencies.contains(&s.resource_type))
                .map(|s| s.id.clone())
                .collect();
            let requires_backup = graph.requires_backup(resource_type);

            for draft in drafts {
                let order = steps.len() as u32 + 1;
                steps.push(DeletionStep {
                    id: draft.id,
                    resource_type,
                    description: draft.description,
                    parameters: draft.parameters,
                    environment: draft.environment,
                    order,
                    requires_backup,
                    dependencies: depends_on.clone(),
                });
            }
        }

        for resource_type in &selection.selected_types {
            if !graph
                .deletion_order
                .iter()
                .any(|p| p.resource_type == *resource_type)
            {
                warn!(%resource_type, "No deletion priority for resource type, skipping");
            }
        }

        let estimated_duration = steps.len() as u64 * SECONDS_PER_STEP;

        CleanupPlan {
            project_name: inventory.project_name.clone(),
            steps,
            target_resources: selection.clone(),
            backup_plan: self.backup_plan(inventory, now),
            estimated_duration,
            risk_level: graph.risk_assessment.overall,
        }
    }

    fn backup_plan(&self, inventory: &ProjectInventory, now: DateTime<Utc>) -> BackupPlan {
        let folder = format!(
            "{}-{}",
            inventory.project_name,
            now.format("%Y%m%d-%H%M%S")
        );
        BackupPlan {
            entries: Vec::new(),
            estimated_size_bytes: 0,
            destination: Path::new(&inventory.project_path)
                .join(&self.backup_root)
                .join(folder),
        }
    }
}

/// Build a plan with the default backup root
pub fn build_plan(inventory: &ProjectInventory, selection: &ResourceSelection) -> CleanupPlan {
    PlanBuilder::default().build(inventory, selection)
}

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn vercel_steps(inventory: &ProjectInventory) -> Vec<StepDraft> {
    let Some(vercel) = &inventory.vercel else {
        return Vec::new();
    };
    let Some(project_id) = &vercel.project_id else {
        return Vec::new();
    };

    let mut parameters = params(&[
        ("projectId", project_id.as_str()),
        ("projectName", inventory.project_name.as_str()),
    ]);
    if let Some(org_id) = &vercel.org_id {
        parameters.insert("orgId".to_string(), org_id.clone());
    }
    if !vercel.domains.is_empty() {
        parameters.insert("domains".to_string(), vercel.domains.join(","));
    }

    vec![StepDraft {
        id: format!("{}:{}", ResourceType::VercelProject, project_id),
        description: format!("Delete Vercel project {}", project_id),
        parameters,
        environment: None,
    }]
}

/// One step per database identifier
///
/// Tiers that share a database (a URL from the shared `.env`) collapse into the
/// first selected tier holding it; `environments` lists all of them.
fn database_steps(
    inventory: &ProjectInventory,
    resource_type: ResourceType,
    environments: &[EnvironmentKey],
) -> Vec<StepDraft> {
    let name_key = match resource_type {
        ResourceType::SupabaseProject => "projectRef",
        _ => "databaseName",
    };

    let selected: Vec<&DatabaseResource> = inventory
        .databases_of(resource_type)
        .iter()
        .filter(|db| environments.contains(&db.environment))
        .collect();

    let mut seen: Vec<&str> = Vec::new();
    let mut drafts = Vec::new();
    for db in &selected {
        if seen.contains(&db.identifier.as_str()) {
            continue;
        }
        seen.push(db.identifier.as_str());

        let tiers: Vec<&str> = selected
            .iter()
            .filter(|other| other.identifier == db.identifier)
            .map(|other| other.environment.as_str())
            .collect();

        let mut parameters = params(&[
            (name_key, db.identifier.as_str()),
            ("url", db.url.as_str()),
            ("environment", db.environment.as_str()),
        ]);
        parameters.insert("environments".to_string(), tiers.join(","));

        drafts.push(StepDraft {
            id: format!("{}:{}:{}", resource_type, db.environment, db.identifier),
            description: format!(
                "Delete {} {} ({})",
                resource_type.display_name(),
                db.identifier,
                tiers.join(", ")
            ),
            parameters,
            environment: Some(db.environment),
        });
    }
    drafts
}

fn blob_steps(inventory: &ProjectInventory) -> Vec<StepDraft> {
    let Some(storage) = &inventory.storage else {
        return Vec::new();
    };

    storage
        .blob_stores
        .iter()
        .map(|store| StepDraft {
            id: format!("{}:{}", ResourceType::BlobStore, store.id),
            description: format!("Delete Vercel Blob store {} ({})", store.name, store.id),
            parameters: params(&[("storeId", store.id.as_str()), ("storeName", store.name.as_str())]),
            environment: None,
        })
        .collect()
}
