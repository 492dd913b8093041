use crate::config::ValidatorConfig;
use crate::issue::ValidationIssue;
use crate::summary::RunSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `report.json` written at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionfixReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    pub config: ValidatorConfig,

    #[serde(default)]
    pub issues: Vec<ReportIssue>,

    pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// An issue plus its stable fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportIssue {
    pub fingerprint: String,

    #[serde(flatten)]
    pub issue: ValidationIssue,
}

impl From<&ValidationIssue> for ReportIssue {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            fingerprint: issue.fingerprint().to_string(),
            issue: issue.clone(),
        }
    }
}

impl VersionfixReport {
    pub fn new(
        tool: ToolInfo,
        run: RunInfo,
        repository: Option<String>,
        config: ValidatorConfig,
        issues: &[ValidationIssue],
        summary: RunSummary,
    ) -> Self {
        Self {
            schema: crate::schema::VERSIONFIX_REPORT_V1.to_string(),
            tool,
            run,
            repository,
            config,
            issues: issues.iter().map(ReportIssue::from).collect(),
            summary,
        }
    }
}
