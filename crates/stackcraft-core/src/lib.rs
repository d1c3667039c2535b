//! Stackcraft Core - Resource discovery and guarded cleanup for scaffolded projects
//!
//! Projects generated by `stackcraft` end up wired to cloud resources (a Vercel
//! project, Turso or Supabase databases, Vercel Blob stores). This library finds
//! those resources from the project's dotenv files and provider config, and turns a
//! user's selection into an ordered, human-approved deletion plan.
//!
//! # Architecture
//!
//! Data flows strictly downstream:
//!
//! - **Environment Map** ([`env`]) - layered dotenv files per deployment tier
//! - **Inventory** ([`resources`]) - resources inferred from the environment map,
//!   without calling any provider API
//! - **Dependencies / Risk** ([`resources::dependencies`]) - fixed deletion priority,
//!   risk factors and backup requirements
//! - **Cleanup Plan** ([`cleanup::plan`]) - ordered deletion steps for a selection
//! - **Confirmation Gate** ([`cleanup::gate`]) - five-stage human approval before a
//!   plan is handed to an external executor
//!
//! Nothing in this crate deletes anything. An approved [`CleanupPlan`] is the output.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts for the confirmation gate
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use stackcraft_core::{ConfirmationGate, GateOutcome, ResourceDiscoverer};
//!
//! let inventory = ResourceDiscoverer::default().discover(&project_dir).await?;
//! match ConfirmationGate::new(&inventory).run(&mut my_prompter)? {
//!     GateOutcome::Approved(plan) => executor.execute(plan),
//!     GateOutcome::Aborted(reason) => eprintln!("Nothing deleted: {}", reason),
//! }
//! ```

pub mod cleanup;
pub mod config;
pub mod env;
pub mod error;
pub mod product;
pub mod resources;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use cleanup::{
    build_plan, AbortReason, Answer, CleanupPlan, CleanupScope, ConfirmationGate,
    ConfirmationPrompter, DeletionStep, GateOutcome, GateStage, PlanBuilder, ResourceSelection,
};
pub use config::FileLayout;
pub use env::{read_environment_map, EnvironmentKey, EnvironmentMap};
pub use error::{DiscoveryError, GateError};
pub use product::ProductConfig;
pub use resources::{discover, mask, ProjectInventory, ResourceDiscoverer, ResourceType};

#[cfg(feature = "tui")]
pub use tui::{run_cleanup, CleanupArgs};
