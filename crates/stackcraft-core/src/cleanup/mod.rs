//! Cleanup planning and confirmation
//!
//! This module provides:
//! - The user's resource selection and the deletion plan built from it
//! - The five-stage confirmation gate a plan must pass before execution

pub mod gate;
pub mod plan;

#[cfg(test)]
pub(crate) mod fixtures;

pub use gate::{
    AbortReason, Answer, ConfirmationGate, ConfirmationPrompter, GateOutcome, GateStage,
    GateState, ResourceChoice, Transition,
};
pub use plan::{
    build_plan, BackupEntry, BackupPlan, CleanupPlan, CleanupScope, DeletionStep, PlanBuilder,
    ResourceSelection, SECONDS_PER_STEP,
};
