//! Inventories shared by the cleanup tests

use crate::env::EnvironmentKey;
use crate::resources::dependencies;
use crate::resources::{
    BlobStoreResource, DatabaseKind, DatabaseResource, DatabaseResources, ProjectInventory,
    StorageResources, VercelResources,
};

fn turso(environment: EnvironmentKey, identifier: &str) -> DatabaseResource {
    DatabaseResource {
        environment,
        identifier: identifier.to_string(),
        url: format!("libsql://{}.turso.io", identifier),
        token: Some("tok_abcdefgh1234".to_string()),
    }
}

pub fn empty_inventory() -> ProjectInventory {
    ProjectInventory {
        project_name: "acme".to_string(),
        project_path: "/work/acme".to_string(),
        vercel: None,
        databases: None,
        storage: None,
        dependencies: dependencies::analyze(),
    }
}

/// One production Turso database
pub fn turso_inventory() -> ProjectInventory {
    ProjectInventory {
        databases: Some(DatabaseResources {
            kind: DatabaseKind::Turso,
            resources: vec![turso(EnvironmentKey::Production, "acme-prod")],
        }),
        ..empty_inventory()
    }
}

/// One Turso database every tier reaches through the shared `.env`
pub fn shared_turso_inventory() -> ProjectInventory {
    ProjectInventory {
        databases: Some(DatabaseResources {
            kind: DatabaseKind::Turso,
            resources: EnvironmentKey::ALL
                .iter()
                .map(|tier| turso(*tier, "acme"))
                .collect(),
        }),
        ..empty_inventory()
    }
}

/// Vercel project, Turso in development and production, two blob stores
pub fn full_inventory() -> ProjectInventory {
    ProjectInventory {
        vercel: Some(VercelResources {
            project_id: Some("prj_123".to_string()),
            org_id: Some("team_1".to_string()),
            domains: vec!["acme.dev".to_string()],
            environment_variables: vec![],
        }),
        databases: Some(DatabaseResources {
            kind: DatabaseKind::Turso,
            resources: vec![
                turso(EnvironmentKey::Development, "acme-dev"),
                turso(EnvironmentKey::Production, "acme-prod"),
            ],
        }),
        storage: Some(StorageResources {
            blob_stores: vec![
                BlobStoreResource {
                    id: "store1".to_string(),
                    name: "assets".to_string(),
                    token: "vercel_blob_rw_store1_secret".to_string(),
                },
                BlobStoreResource {
                    id: "store2".to_string(),
                    name: "uploads".to_string(),
                    token: "vercel_blob_rw_store2_secret".to_string(),
                },
            ],
        }),
        ..empty_inventory()
    }
}
