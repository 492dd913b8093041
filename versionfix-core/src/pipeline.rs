//! The check pipeline, extracted from the CLI.
//!
//! Phases run strictly in order: load the snapshot, build the state, evaluate every rule, then
//! remediate (manual or auto-fix). All I/O goes through the port traits.

use crate::adapters::SnapshotRepository;
use crate::ports::{StateSource, WritePort};
use crate::settings::CheckSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use tracing::{debug, info};
use versionfix_domain::{BuiltState, RuleEngine, StateBuilder};
use versionfix_remediate::{Sleeper, auto_fix, render_manual};
use versionfix_render::render_summary_md;
use versionfix_snapshot::{Snapshot, snapshot_to_json};
use versionfix_types::config::ValidatorConfig;
use versionfix_types::report::{RunInfo, ToolInfo, VersionfixReport};
use versionfix_types::summary::{RunMode, RunSummary};

/// Error type for pipeline results. Exit code 2 = unresolved error issues, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unresolved error-severity issues remain")]
    IssuesRemain,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolError::IssuesRemain => 2,
            ToolError::Internal(_) => 1,
        }
    }
}

/// Outcome of `run_check`.
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: VersionfixReport,
    /// The mutated snapshot, present after auto-fix.
    pub snapshot: Option<Snapshot>,
    pub issues_remain: bool,
}

/// Build the state from `snapshot` and attach every rule's issues to it.
pub fn evaluate(snapshot: &Snapshot, config: &ValidatorConfig) -> anyhow::Result<BuiltState> {
    let mut built = StateBuilder::new(config.clone())
        .repository(snapshot.repository.clone())
        .releases(snapshot.release_infos());
    for r in &snapshot.tags {
        built = built.tag(r.name.clone(), r.sha.clone());
    }
    for r in &snapshot.branches {
        built = built.branch(r.name.clone(), r.sha.clone());
    }
    let mut built = built.build();

    let issues = RuleEngine::new()
        .evaluate(&built.state)
        .context("evaluate rules")?;
    info!(issues = issues.len(), "rule evaluation complete");
    built.state.append_issues(issues);
    Ok(built)
}

/// Run the check pipeline. Returns the report and, after auto-fix, the mutated snapshot.
///
/// The caller is responsible for writing artifacts (via `WritePort`) or the convenience
/// `write_check_artifacts` helper, and for mapping `issues_remain` to an exit code.
pub fn run_check(
    settings: &CheckSettings,
    source: &dyn StateSource,
    sleeper: &dyn Sleeper,
    tool: ToolInfo,
) -> Result<CheckOutcome, ToolError> {
    let started_at = Utc::now();
    let snapshot = source.load_snapshot()?;

    let BuiltState {
        state,
        rejected_ignore_patterns,
    } = evaluate(&snapshot, &settings.config)?;
    let repository = state.repository.clone();
    let mut issues = state.into_issues();

    let (manual_commands, mutated) = match settings.mode {
        RunMode::Manual => {
            let commands = render_manual(&mut issues).context("plan remediation")?;
            (commands, None)
        }
        RunMode::AutoFix => {
            info!(issues = issues.len(), "auto-fix starting");
            let mut repo = SnapshotRepository::new(snapshot);
            let commands = auto_fix(&mut issues, &mut repo, &settings.retry, sleeper)
                .context("auto-fix")?;
            (commands, Some(repo.into_snapshot()))
        }
    };

    let summary = RunSummary::calculate(
        settings.mode,
        &issues,
        manual_commands,
        rejected_ignore_patterns,
    );
    debug!(?summary, "run summary");

    let issues_remain = !summary.success;
    let report = VersionfixReport::new(
        tool,
        RunInfo {
            started_at,
            ended_at: Some(Utc::now()),
        },
        repository,
        settings.config.clone(),
        &issues,
        summary,
    );

    Ok(CheckOutcome {
        report,
        snapshot: mutated,
        issues_remain,
    })
}

/// Write `report.json` and `summary.md` to the output directory.
pub fn write_check_artifacts(
    outcome: &CheckOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let summary_md = render_summary_md(&outcome.report);
    writer.write_file(&out_dir.join("summary.md"), summary_md.as_bytes())?;

    Ok(())
}

/// Write the mutated snapshot, if any, to `path`.
pub fn write_snapshot(
    outcome: &CheckOutcome,
    path: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    let Some(snapshot) = &outcome.snapshot else {
        return Ok(());
    };
    writer.write_file(path, snapshot_to_json(snapshot)?.as_bytes())?;
    info!(path = %path, "snapshot written");
    Ok(())
}
