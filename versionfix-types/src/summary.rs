use crate::issue::{IssueStatus, Severity, ValidationIssue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Render commands only; nothing is mutated.
    #[default]
    Manual,
    AutoFix,
}

/// Summary contract returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub total_issues: u64,
    pub errors: u64,
    pub warnings: u64,
    pub fixed: u64,
    pub failed: u64,
    pub unfixable: u64,
    pub manual_fix_required: u64,
    pub pending: u64,

    #[serde(default)]
    pub manual_commands: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_ignore_patterns: Vec<String>,

    /// True iff no error-severity issue is left unresolved.
    pub success: bool,
}

impl RunSummary {
    pub fn calculate(
        mode: RunMode,
        issues: &[ValidationIssue],
        manual_commands: Vec<String>,
        rejected_ignore_patterns: Vec<String>,
    ) -> Self {
        let mut summary = RunSummary {
            mode,
            total_issues: issues.len() as u64,
            manual_commands,
            rejected_ignore_patterns,
            ..Default::default()
        };

        let mut unresolved_errors = 0u64;
        for issue in issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
            }
            match issue.status() {
                IssueStatus::Pending => summary.pending += 1,
                IssueStatus::Fixed => summary.fixed += 1,
                IssueStatus::Failed => summary.failed += 1,
                IssueStatus::Unfixable => summary.unfixable += 1,
                IssueStatus::ManualFixRequired => summary.manual_fix_required += 1,
            }
            if issue.severity == Severity::Error && issue.is_unresolved() {
                unresolved_errors += 1;
            }
        }

        summary.success = unresolved_errors == 0;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueType;

    #[test]
    fn warnings_do_not_fail_the_run() {
        let issues = vec![ValidationIssue::new(
            IssueType::WrongRefType,
            Severity::Warning,
            "v1",
            "",
        )];
        let summary = RunSummary::calculate(RunMode::Manual, &issues, vec![], vec![]);
        assert!(summary.success);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.pending, 1);
    }

    #[test]
    fn fixed_errors_count_as_resolved() {
        let mut fixed = ValidationIssue::new(IssueType::DraftRelease, Severity::Error, "v1.0.0", "");
        fixed.transition(IssueStatus::Fixed).unwrap();
        let mut failed =
            ValidationIssue::new(IssueType::MissingRelease, Severity::Error, "v1.0.1", "");
        failed.transition(IssueStatus::Failed).unwrap();

        let summary = RunSummary::calculate(RunMode::AutoFix, &[fixed.clone()], vec![], vec![]);
        assert!(summary.success);
        assert_eq!(summary.fixed, 1);

        let summary = RunSummary::calculate(RunMode::AutoFix, &[fixed, failed], vec![], vec![]);
        assert!(!summary.success);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_issues, 2);
    }
}
