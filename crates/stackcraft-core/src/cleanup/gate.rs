//! Five-stage confirmation gate
//!
//! Stages run strictly in order:
//!
//! 1. **ResourceSelection** - pick resource types (and a scope when several
//!    environment-tiered resources are involved)
//! 2. **RiskDisplay** - show the risk factors relevant to the selection
//! 3. **BackupAttestation** - the user states that backups are done
//! 4. **PlanReview** - show the ordered plan and confirm it
//! 5. **FinalConfirmation** - re-type the project name
//!
//! A "no" or a cancellation at any stage ends the flow with no plan. The gate
//! itself never deletes anything.

use super::plan::{CleanupPlan, CleanupScope, PlanBuilder, ResourceSelection};
use crate::env::EnvironmentKey;
use crate::error::GateError;
use crate::resources::{ProjectInventory, ResourceType, RiskAssessment};
use std::fmt;
use std::io;
use tracing::debug;

/// A prompt response: a value, or the user backed out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    Given(T),
    Cancelled,
}

/// One selectable resource type with how many instances it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChoice {
    pub resource_type: ResourceType,
    pub count: usize,
    pub label: String,
}

/// The human on the other side of the gate
///
/// Implementations block until the user answers. An `Err` means the prompt
/// itself broke (e.g. no terminal), which is different from the user saying no.
pub trait ConfirmationPrompter {
    fn select_resources(
        &mut self,
        choices: &[ResourceChoice],
    ) -> io::Result<Answer<Vec<ResourceType>>>;

    fn select_scope(&mut self, scopes: &[CleanupScope]) -> io::Result<Answer<CleanupScope>>;

    fn show_risks(&mut self, risks: &RiskAssessment) -> io::Result<()>;

    fn show_plan(&mut self, plan: &CleanupPlan) -> io::Result<()>;

    fn confirm(&mut self, message: &str) -> io::Result<Answer<bool>>;

    fn input(&mut self, message: &str) -> io::Result<Answer<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateStage {
    ResourceSelection,
    RiskDisplay,
    BackupAttestation,
    PlanReview,
    FinalConfirmation,
}

impl fmt::Display for GateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GateStage::ResourceSelection => "resource selection",
            GateStage::RiskDisplay => "risk display",
            GateStage::BackupAttestation => "backup attestation",
            GateStage::PlanReview => "plan review",
            GateStage::FinalConfirmation => "final confirmation",
        };
        write!(f, "{}", s)
    }
}

/// Where the gate is, with everything collected so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    ResourceSelection,
    RiskDisplay { selection: ResourceSelection },
    BackupAttestation { selection: ResourceSelection },
    PlanReview { selection: ResourceSelection },
    FinalConfirmation { plan: CleanupPlan },
}

impl GateState {
    pub fn stage(&self) -> GateStage {
        match self {
            GateState::ResourceSelection => GateStage::ResourceSelection,
            GateState::RiskDisplay { .. } => GateStage::RiskDisplay,
            GateState::BackupAttestation { .. } => GateStage::BackupAttestation,
            GateState::PlanReview { .. } => GateStage::PlanReview,
            GateState::FinalConfirmation { .. } => GateStage::FinalConfirmation,
        }
    }
}

/// Why nothing will be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The inventory holds nothing deletable
    NoResources,
    SelectionEmpty,
    BackupNotAttested,
    /// The selection and scope produced no steps
    NothingToDelete,
    PlanDeclined,
    NameMismatch,
    Cancelled(GateStage),
}

impl AbortReason {
    pub fn stage(&self) -> GateStage {
        match self {
            AbortReason::NoResources | AbortReason::SelectionEmpty => GateStage::ResourceSelection,
            AbortReason::BackupNotAttested => GateStage::BackupAttestation,
            AbortReason::NothingToDelete | AbortReason::PlanDeclined => GateStage::PlanReview,
            AbortReason::NameMismatch => GateStage::FinalConfirmation,
            AbortReason::Cancelled(stage) => *stage,
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoResources => write!(f, "no deletable resources were found"),
            AbortReason::SelectionEmpty => write!(f, "no resources were selected"),
            AbortReason::BackupNotAttested => write!(f, "backups were not confirmed"),
            AbortReason::NothingToDelete => {
                write!(f, "the selection does not match any resource")
            }
            AbortReason::PlanDeclined => write!(f, "the cleanup plan was declined"),
            AbortReason::NameMismatch => write!(f, "the project name did not match"),
            AbortReason::Cancelled(stage) => write!(f, "cancelled during {}", stage),
        }
    }
}

/// Result of running one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Aborted(AbortReason),
    Advanced(GateState),
    Completed(CleanupPlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Approved(CleanupPlan),
    Aborted(AbortReason),
}

impl GateOutcome {
    pub fn into_plan(self) -> Option<CleanupPlan> {
        match self {
            GateOutcome::Approved(plan) => Some(plan),
            GateOutcome::Aborted(_) => None,
        }
    }
}

/// Confirmation flow over one inventory
pub struct ConfirmationGate<'a> {
    inventory: &'a ProjectInventory,
    builder: PlanBuilder,
}

impl<'a> ConfirmationGate<'a> {
    pub fn new(inventory: &'a ProjectInventory) -> Self {
        Self {
            inventory,
            builder: PlanBuilder::default(),
        }
    }

    /// Use a custom plan builder (e.g. a different backup root)
    pub fn with_builder(mut self, builder: PlanBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Run every stage from the start until approval or abort
    pub fn run<P>(&self, prompter: &mut P) -> Result<GateOutcome, GateError>
    where
        P: ConfirmationPrompter + ?Sized,
    {
        let mut state = GateState::ResourceSelection;
        loop {
            let stage = state.stage();
            match self.step(state, prompter)? {
                Transition::Advanced(next) => {
                    debug!(from = %stage, to = %next.stage(), "Gate advanced");
                    state = next;
                }
                Transition::Completed(plan) => return Ok(GateOutcome::Approved(plan)),
                Transition::Aborted(reason) => {
                    debug!(%stage, %reason, "Gate aborted");
                    return Ok(GateOutcome::Aborted(reason));
                }
            }
        }
    }

    /// Run a single stage
    pub fn step<P>(&self, state: GateState, prompter: &mut P) -> Result<Transition, GateError>
    where
        P: ConfirmationPrompter + ?Sized,
    {
        let transition = match state {
            GateState::ResourceSelection => self.select_resources(prompter)?,

            GateState::RiskDisplay { selection } => {
                let risks = self
                    .inventory
                    .dependencies
                    .risk_assessment
                    .for_selection(&selection.selected_types);
                prompter.show_risks(&risks)?;
                Transition::Advanced(GateState::BackupAttestation { selection })
            }

            GateState::BackupAttestation { selection } => {
                match prompter.confirm(&self.backup_question(&selection))? {
                    Answer::Given(true) => Transition::Advanced(GateState::PlanReview { selection }),
                    Answer::Given(false) => Transition::Aborted(AbortReason::BackupNotAttested),
                    Answer::Cancelled => {
                        Transition::Aborted(AbortReason::Cancelled(GateStage::BackupAttestation))
                    }
                }
            }

            GateState::PlanReview { selection } => {
                let plan = self.builder.build(self.inventory, &selection);
                if plan.is_empty() {
                    return Ok(Transition::Aborted(AbortReason::NothingToDelete));
                }

                prompter.show_plan(&plan)?;
                match prompter.confirm("Proceed with this cleanup plan?")? {
                    Answer::Given(true) => {
                        Transition::Advanced(GateState::FinalConfirmation { plan })
                    }
                    Answer::Given(false) => Transition::Aborted(AbortReason::PlanDeclined),
                    Answer::Cancelled => {
                        Transition::Aborted(AbortReason::Cancelled(GateStage::PlanReview))
                    }
                }
            }

            GateState::FinalConfirmation { plan } => {
                let expected = &self.inventory.project_name;
                let message = format!("Type the project name ({}) to confirm deletion", expected);
                match prompter.input(&message)? {
                    Answer::Given(typed) if typed.trim() == expected.as_str() => {
                        Transition::Completed(plan)
                    }
                    Answer::Given(_) => Transition::Aborted(AbortReason::NameMismatch),
                    Answer::Cancelled => {
                        Transition::Aborted(AbortReason::Cancelled(GateStage::FinalConfirmation))
                    }
                }
            }
        };

        Ok(transition)
    }

    /// Resource types offered for selection: those with at least one instance
    pub fn resource_choices(&self) -> Vec<ResourceChoice> {
        self.inventory
            .available_types()
            .into_iter()
            .map(|resource_type| {
                let count = self.inventory.count(resource_type);
                ResourceChoice {
                    resource_type,
                    count,
                    label: format!("{} ({})", resource_type.display_name(), count),
                }
            })
            .collect()
    }

    fn select_resources<P>(&self, prompter: &mut P) -> Result<Transition, GateError>
    where
        P: ConfirmationPrompter + ?Sized,
    {
        let choices = self.resource_choices();
        if choices.is_empty() {
            return Ok(Transition::Aborted(AbortReason::NoResources));
        }

        let answered = match prompter.select_resources(&choices)? {
            Answer::Given(types) => types,
            Answer::Cancelled => {
                return Ok(Transition::Aborted(AbortReason::Cancelled(
                    GateStage::ResourceSelection,
                )))
            }
        };

        // Offered order, offered types only
        let selected: Vec<ResourceType> = choices
            .iter()
            .map(|c| c.resource_type)
            .filter(|t| answered.contains(t))
            .collect();
        if selected.is_empty() {
            return Ok(Transition::Aborted(AbortReason::SelectionEmpty));
        }

        let tiered: usize = selected
            .iter()
            .filter(|t| t.is_environment_tiered())
            .map(|t| self.inventory.count(*t))
            .sum();

        let scope = if tiered > 1 {
            match prompter.select_scope(&self.scope_options(&selected))? {
                Answer::Given(scope) => scope,
                Answer::Cancelled => {
                    return Ok(Transition::Aborted(AbortReason::Cancelled(
                        GateStage::ResourceSelection,
                    )))
                }
            }
        } else {
            CleanupScope::All
        };

        Ok(Transition::Advanced(GateState::RiskDisplay {
            selection: ResourceSelection::new(selected, scope),
        }))
    }

    /// Tiers that actually hold a selected resource, then "all"
    fn scope_options(&self, selected: &[ResourceType]) -> Vec<CleanupScope> {
        let present: Vec<EnvironmentKey> = selected
            .iter()
            .flat_map(|t| self.inventory.databases_of(*t))
            .map(|db| db.environment)
            .collect();

        EnvironmentKey::ALL
            .into_iter()
            .filter(|tier| present.contains(tier))
            .map(CleanupScope::from)
            .chain(std::iter::once(CleanupScope::All))
            .collect()
    }

    fn backup_question(&self, selection: &ResourceSelection) -> String {
        let required: Vec<String> = self
            .inventory
            .dependencies
            .backup_requirements
            .iter()
            .filter(|b| b.required && selection.selected_types.contains(&b.resource_type))
            .map(|b| format!("  - {}: {}", b.resource_type.display_name(), b.description))
            .collect();

        if required.is_empty() {
            "Have you saved everything you need from the selected resources?".to_string()
        } else {
            format!("Have you completed these backups?\n{}", required.join("\n"))
        }
    }
}
