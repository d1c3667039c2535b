//! Deletion priority, risk assessment and backup requirements
//!
//! Static policy, independent of what was discovered. Lower priority values are
//! deleted first; data stores always come last.

use super::types::{
    BackupKind, BackupRequirement, DeletionPriority, DependencyGraph, ResourceType, RiskAssessment,
    RiskFactor, RiskKind, RiskLevel,
};

/// The full dependency graph attached to every inventory
pub fn analyze() -> DependencyGraph {
    DependencyGraph {
        deletion_order: deletion_order(),
        risk_assessment: risk_assessment(),
        backup_requirements: backup_requirements(),
    }
}

/// Resource types sorted by ascending priority
pub fn deletion_order() -> Vec<DeletionPriority> {
    vec![
        DeletionPriority {
            resource_type: ResourceType::BlobStore,
            priority: 1,
            dependencies: vec![],
        },
        DeletionPriority {
            resource_type: ResourceType::VercelProject,
            priority: 2,
            dependencies: vec![ResourceType::BlobStore],
        },
        DeletionPriority {
            resource_type: ResourceType::TursoDatabase,
            priority: 3,
            dependencies: vec![],
        },
        DeletionPriority {
            resource_type: ResourceType::SupabaseProject,
            priority: 3,
            dependencies: vec![],
        },
    ]
}

pub fn risk_assessment() -> RiskAssessment {
    RiskAssessment {
        overall: RiskLevel::High,
        factors: vec![
            RiskFactor {
                kind: RiskKind::DataLoss,
                severity: RiskLevel::High,
                description: "Deleting databases permanently destroys all stored data".to_string(),
                affected_resources: vec![ResourceType::TursoDatabase, ResourceType::SupabaseProject],
            },
            RiskFactor {
                kind: RiskKind::ServiceDisruption,
                severity: RiskLevel::High,
                description: "Deleting the Vercel project takes every deployment and domain offline"
                    .to_string(),
                affected_resources: vec![ResourceType::VercelProject],
            },
        ],
        mitigations: vec![
            "Back up all data before deleting anything".to_string(),
            "Delete one environment at a time, starting with development".to_string(),
            "Audit the provider dashboards afterwards for leftover resources".to_string(),
        ],
    }
}

pub fn backup_requirements() -> Vec<BackupRequirement> {
    vec![
        BackupRequirement {
            resource_type: ResourceType::VercelProject,
            kind: BackupKind::Configuration,
            required: true,
            estimated_size: Some("< 1 MB".to_string()),
            description: "Project settings, environment variables and domain configuration"
                .to_string(),
        },
        BackupRequirement {
            resource_type: ResourceType::TursoDatabase,
            kind: BackupKind::Data,
            required: true,
            estimated_size: None,
            description: "Full SQL dump of every Turso database".to_string(),
        },
        BackupRequirement {
            resource_type: ResourceType::SupabaseProject,
            kind: BackupKind::Data,
            required: true,
            estimated_size: None,
            description: "Database dump and storage objects of the Supabase project".to_string(),
        },
    ]
}
