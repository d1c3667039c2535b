//! Charm-style cleanup prompts using cliclack

use crate::cleanup::{
    Answer, CleanupPlan, CleanupScope, ConfirmationGate, ConfirmationPrompter, GateOutcome,
    PlanBuilder, ResourceChoice,
};
use crate::product::ProductConfig;
use crate::resources::{ProjectInventory, ResourceDiscoverer, ResourceType, RiskAssessment};
use anyhow::Result;
use console::style;
use std::io;
use std::path::PathBuf;

/// CLI arguments for the cleanup command
#[derive(Debug, Clone, Default)]
pub struct CleanupArgs {
    /// Project directory to inspect
    pub directory: Option<PathBuf>,
}

/// Ctrl-C and Esc surface from cliclack as `Interrupted`
fn answer<T>(result: io::Result<T>) -> io::Result<Answer<T>> {
    match result {
        Ok(value) => Ok(Answer::Given(value)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(Answer::Cancelled),
        Err(e) => Err(e),
    }
}

/// Terminal prompter backed by cliclack
#[derive(Debug, Default)]
pub struct CliclackPrompter;

impl ConfirmationPrompter for CliclackPrompter {
    fn select_resources(
        &mut self,
        choices: &[ResourceChoice],
    ) -> io::Result<Answer<Vec<ResourceType>>> {
        let mut multi = cliclack::multiselect("Select resources to delete");
        for choice in choices {
            multi = multi.item(choice.resource_type, &choice.label, "");
        }
        answer(multi.required(false).interact())
    }

    fn select_scope(&mut self, scopes: &[CleanupScope]) -> io::Result<Answer<CleanupScope>> {
        let mut select = cliclack::select("Which environments?");
        for scope in scopes {
            select = select.item(*scope, scope.label(), "");
        }
        answer(select.interact())
    }

    fn show_risks(&mut self, risks: &RiskAssessment) -> io::Result<()> {
        let mut lines = vec![format!("Overall risk: {}", style(risks.overall).red().bold())];
        for factor in &risks.factors {
            lines.push(format!("[{}] {}", factor.severity, factor.description));
        }
        if !risks.mitigations.is_empty() {
            lines.push(String::new());
            lines.push("Before you continue:".to_string());
            for mitigation in &risks.mitigations {
                lines.push(format!("  - {}", mitigation));
            }
        }
        cliclack::note("Risks", lines.join("\n"))
    }

    fn show_plan(&mut self, plan: &CleanupPlan) -> io::Result<()> {
        let mut lines: Vec<String> = plan
            .steps
            .iter()
            .map(|step| {
                let backup = if step.requires_backup {
                    " (backup required)"
                } else {
                    ""
                };
                format!("{}. {}{}", step.order, step.description, backup)
            })
            .collect();
        lines.push(String::new());
        lines.push(format!("Estimated duration: {}s", plan.estimated_duration));
        lines.push(format!("Risk level: {}", style(plan.risk_level).red().bold()));
        lines.push(format!(
            "Backups go to: {}",
            plan.backup_plan.destination.display()
        ));
        cliclack::note("Cleanup plan", lines.join("\n"))
    }

    fn confirm(&mut self, message: &str) -> io::Result<Answer<bool>> {
        answer(cliclack::confirm(message).initial_value(false).interact())
    }

    fn input(&mut self, message: &str) -> io::Result<Answer<String>> {
        answer(cliclack::input(message).interact::<String>())
    }
}

/// Discover a project's resources and walk the user through the gate
///
/// Returns the approved plan, or `None` when any stage stopped the flow.
pub async fn run_cleanup<C: ProductConfig>(
    config: &C,
    args: CleanupArgs,
) -> Result<Option<CleanupPlan>> {
    cliclack::intro(format!("{} cleanup", config.display_name()))?;

    let project_dir = config.project_dir(args.directory.as_deref());
    let inventory = discover_with_spinner(config, &project_dir).await?;

    cliclack::note(
        format!("Resources in {}", inventory.project_name),
        inventory.summary_lines().join("\n"),
    )?;

    let gate =
        ConfirmationGate::new(&inventory).with_builder(PlanBuilder::new(config.backup_root()));
    let mut prompter = CliclackPrompter;

    match gate.run(&mut prompter)? {
        GateOutcome::Approved(plan) => {
            cliclack::outro(format!(
                "Plan approved: {} step(s) for {}",
                plan.steps.len(),
                plan.project_name
            ))?;
            Ok(Some(plan))
        }
        GateOutcome::Aborted(reason) => {
            cliclack::log::remark(format!("Manual cleanup guide: {}", config.docs_url()))?;
            cliclack::outro_cancel(format!("Nothing will be deleted: {}", reason))?;
            Ok(None)
        }
    }
}

async fn discover_with_spinner<C: ProductConfig>(
    config: &C,
    project_dir: &std::path::Path,
) -> Result<ProjectInventory> {
    let spinner = cliclack::spinner();
    spinner.start("Discovering resources...");

    match ResourceDiscoverer::new(config.file_layout())
        .discover(project_dir)
        .await
    {
        Ok(inventory) => {
            let found = inventory.available_types().len();
            spinner.stop(format!("Found {} resource type(s)", found));
            Ok(inventory)
        }
        Err(e) => {
            spinner.stop("Discovery failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_maps_to_cancel() {
        let result: io::Result<bool> = Err(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert_eq!(answer(result).unwrap(), Answer::Cancelled);
    }

    #[test]
    fn test_other_errors_propagate() {
        let result: io::Result<bool> = Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(answer(result).is_err());
    }

    #[test]
    fn test_value_is_given() {
        assert_eq!(answer(Ok("acme".to_string())).unwrap(), Answer::Given("acme".to_string()));
    }
}
