use crate::commands::manual_commands;
use crate::error::{PlanningError, RemediateError, RepoError};
use crate::planner::plan_order;
use crate::port::RepositoryPort;
use crate::retry::{with_retry, Attempted, RetryPolicy, Sleeper};
use tracing::{debug, info, warn};
use versionfix_types::action::RemediationAction;
use versionfix_types::issue::{IssueStatus, StepOutcome, ValidationIssue};

fn push_unique(all: &mut Vec<String>, cmds: &[String]) {
    for cmd in cmds {
        if !all.contains(cmd) {
            all.push(cmd.clone());
        }
    }
}

/// Attach manual commands to every actionable issue, in plan order.
///
/// Returns the de-duplicated command list across all issues; statuses stay `pending`.
pub fn render_manual(issues: &mut [ValidationIssue]) -> Result<Vec<String>, PlanningError> {
    let order = plan_order(issues)?;
    let mut all = Vec::new();
    for idx in order {
        let issue = &mut issues[idx];
        let Some(action) = &issue.remediation_action else {
            continue;
        };
        let cmds = manual_commands(action);
        push_unique(&mut all, &cmds);
        issue.manual_commands = cmds;
    }
    Ok(all)
}

#[derive(Default)]
struct Execution {
    steps: Vec<StepOutcome>,
    error: Option<RepoError>,
}

impl Execution {
    fn record<T>(&mut self, step: &str, attempted: Attempted<T>) -> Option<T> {
        let Attempted { result, attempts } = attempted;
        match result {
            Ok(value) => {
                self.steps.push(StepOutcome {
                    step: step.to_string(),
                    succeeded: true,
                    attempts,
                    error: None,
                });
                Some(value)
            }
            Err(err) => {
                self.steps.push(StepOutcome {
                    step: step.to_string(),
                    succeeded: false,
                    attempts,
                    error: Some(err.to_string()),
                });
                self.error = Some(err);
                None
            }
        }
    }

    fn completed(&self) -> usize {
        self.steps.iter().take_while(|s| s.succeeded).count()
    }
}

fn execute(
    action: &RemediationAction,
    port: &mut dyn RepositoryPort,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
) -> Execution {
    let destructive = RetryPolicy::no_retry();
    let mut exec = Execution::default();
    match action {
        RemediationAction::CreateRef { kind, name, sha } => {
            exec.record(
                "create_ref",
                with_retry(policy, sleeper, || port.create_ref(*kind, name, sha)),
            );
        }
        RemediationAction::UpdateRef {
            kind,
            name,
            sha,
            force,
        } => {
            exec.record(
                "update_ref",
                with_retry(policy, sleeper, || port.update_ref(*kind, name, sha, *force)),
            );
        }
        RemediationAction::DeleteRef { kind, name } => {
            exec.record(
                "delete_ref",
                with_retry(&destructive, sleeper, || port.delete_ref(*kind, name)),
            );
        }
        RemediationAction::ConvertRefKind {
            name,
            sha,
            from,
            to,
        } => {
            let created = exec.record(
                "create_ref",
                with_retry(policy, sleeper, || port.create_ref(*to, name, sha)),
            );
            if created.is_some() {
                exec.record(
                    "delete_ref",
                    with_retry(&destructive, sleeper, || port.delete_ref(*from, name)),
                );
            }
        }
        RemediationAction::CreateRelease {
            tag,
            draft,
            publish,
        } => {
            let created = exec.record(
                "create_release",
                with_retry(policy, sleeper, || port.create_release(tag, *draft)),
            );
            if let Some(id) = created
                && *draft
                && *publish
            {
                exec.record(
                    "publish_release",
                    with_retry(policy, sleeper, || port.publish_release(id)),
                );
            }
        }
        RemediationAction::PublishRelease { release_id, .. } => {
            exec.record(
                "publish_release",
                with_retry(policy, sleeper, || port.publish_release(*release_id)),
            );
        }
        RemediationAction::RepublishRelease { release_id, .. } => {
            exec.record(
                "republish_release",
                with_retry(policy, sleeper, || port.republish_release(*release_id)),
            );
        }
        RemediationAction::DeleteRelease { release_id, .. } => {
            exec.record(
                "delete_release",
                with_retry(&destructive, sleeper, || port.delete_release(*release_id)),
            );
        }
    }
    exec
}

fn failure_message(exec: &Execution, err: &RepoError) -> String {
    let done: Vec<&str> = exec
        .steps
        .iter()
        .filter(|s| s.succeeded)
        .map(|s| s.step.as_str())
        .collect();
    let failed = exec
        .steps
        .iter()
        .find(|s| !s.succeeded)
        .map_or("action", |s| s.step.as_str());
    if done.is_empty() {
        format!("{failed} failed: {err}")
    } else {
        format!(
            "partially applied: {} succeeded, {failed} failed: {err}",
            done.join(", ")
        )
    }
}

/// Apply every actionable issue through `port`, in plan order.
///
/// Transport failures never escape: each one is folded into the owning issue's status. Issues
/// left for a human get fallback commands, which are also returned de-duplicated.
pub fn auto_fix(
    issues: &mut [ValidationIssue],
    port: &mut dyn RepositoryPort,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
) -> Result<Vec<String>, RemediateError> {
    let order = plan_order(issues)?;
    let mut all = Vec::new();

    for idx in order {
        if issues[idx].status().is_terminal() {
            debug!(issue = %issues[idx].id, status = %issues[idx].status(), "already settled");
            continue;
        }

        let blockers: Vec<String> = issues[idx]
            .dependencies
            .iter()
            .filter(|dep| {
                issues
                    .iter()
                    .find(|i| &i.id == *dep)
                    .map(ValidationIssue::status)
                    != Some(IssueStatus::Fixed)
            })
            .cloned()
            .collect();

        let issue = &mut issues[idx];
        let Some(action) = issue.remediation_action.clone() else {
            issue.transition(IssueStatus::ManualFixRequired)?;
            issue.status_message = Some("no automatic remediation available".to_string());
            debug!(issue = %issue.id, "no action; manual fix required");
            continue;
        };

        if !blockers.is_empty() {
            let cmds = manual_commands(&action);
            push_unique(&mut all, &cmds);
            issue.transition(IssueStatus::ManualFixRequired)?;
            issue.status_message = Some(format!("blocked by {}", blockers.join(", ")));
            issue.manual_commands = cmds;
            warn!(issue = %issue.id, blocked_by = ?blockers, "dependency not fixed; skipping");
            continue;
        }

        let exec = execute(&action, port, policy, sleeper);
        let completed = exec.completed();
        match &exec.error {
            None => {
                issue.transition(IssueStatus::Fixed)?;
                issue.status_message = Some(format!("applied {}", action.kind_tag()));
                info!(issue = %issue.id, action = action.kind_tag(), "fixed");
            }
            Some(err) => {
                let status = if err.is_conflict() {
                    IssueStatus::Unfixable
                } else {
                    IssueStatus::Failed
                };
                let mut cmds = manual_commands(&action);
                if action.is_composite() && completed < cmds.len() {
                    cmds.drain(..completed);
                }
                push_unique(&mut all, &cmds);
                issue.transition(status)?;
                issue.status_message = Some(failure_message(&exec, err));
                issue.manual_commands = cmds;
                warn!(
                    issue = %issue.id,
                    action = action.kind_tag(),
                    status = %status,
                    error = %err,
                    "remediation did not complete"
                );
            }
        }
        issue.steps = exec.steps;
    }

    Ok(all)
}
