//! Rendering helpers (markdown) for human-readable artifacts.

use versionfix_types::issue::{IssueStatus, Severity};
use versionfix_types::report::VersionfixReport;
use versionfix_types::summary::RunMode;

pub fn render_summary_md(report: &VersionfixReport) -> String {
    let s = &report.summary;
    let mut out = String::new();
    out.push_str("# versionfix summary\n\n");
    if let Some(repo) = &report.repository {
        out.push_str(&format!("- Repository: `{}`\n", repo));
    }
    out.push_str(&format!("- Mode: `{}`\n", mode_label(s.mode)));
    out.push_str(&format!(
        "- Result: {}\n",
        if s.success { "**passed**" } else { "**failed**" }
    ));
    out.push_str(&format!(
        "- Issues: {} ({} errors, {} warnings)\n",
        s.total_issues, s.errors, s.warnings
    ));
    if s.mode == RunMode::AutoFix {
        out.push_str(&format!(
            "- Fixed: {}\n- Failed: {}\n- Unfixable: {}\n- Manual fix required: {}\n",
            s.fixed, s.failed, s.unfixable, s.manual_fix_required
        ));
    }
    if !s.rejected_ignore_patterns.is_empty() {
        out.push_str(&format!(
            "- Rejected ignore patterns: {}\n",
            s.rejected_ignore_patterns
                .iter()
                .map(|p| format!("`{}`", p))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    out.push('\n');

    out.push_str("## Issues\n\n");
    if report.issues.is_empty() {
        out.push_str("_No issues found._\n");
        return out;
    }

    out.push_str("| Severity | Type | Version | Status | Message |\n");
    out.push_str("|---|---|---|---|---|\n");
    for entry in &report.issues {
        let issue = &entry.issue;
        let message = match &issue.status_message {
            Some(status) => format!("{} ({})", issue.message, status),
            None => issue.message.clone(),
        };
        out.push_str(&format!(
            "| {} | `{}` | `{}` | `{}` | {} |\n",
            severity_label(issue.severity),
            issue.issue_type,
            issue.version,
            status_label(issue.status()),
            escape_cell(&message)
        ));
    }

    if !s.manual_commands.is_empty() {
        out.push_str("\n## Manual commands\n\n```sh\n");
        for cmd in &s.manual_commands {
            out.push_str(cmd);
            out.push('\n');
        }
        out.push_str("```\n");
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn mode_label(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Manual => "manual",
        RunMode::AutoFix => "auto-fix",
    }
}

fn severity_label(s: Severity) -> &'static str {
    match s {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn status_label(s: IssueStatus) -> &'static str {
    match s {
        IssueStatus::Pending => "pending",
        IssueStatus::Fixed => "fixed",
        IssueStatus::Failed => "failed",
        IssueStatus::Unfixable => "unfixable",
        IssueStatus::ManualFixRequired => "manual fix required",
    }
}
