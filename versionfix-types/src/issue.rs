use crate::action::RemediationAction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Taxonomy key for a detected defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    AmbiguousVersion,
    WrongRefType,
    MissingMajorVersion,
    IncorrectVersion,
    MissingMinorVersion,
    IncorrectMinorVersion,
    IncorrectLatest,
    MissingRelease,
    DraftRelease,
    NonImmutableRelease,
    FloatingVersionRelease,
}

impl IssueType {
    pub const ALL: [IssueType; 11] = [
        IssueType::AmbiguousVersion,
        IssueType::WrongRefType,
        IssueType::MissingMajorVersion,
        IssueType::IncorrectVersion,
        IssueType::MissingMinorVersion,
        IssueType::IncorrectMinorVersion,
        IssueType::IncorrectLatest,
        IssueType::MissingRelease,
        IssueType::DraftRelease,
        IssueType::NonImmutableRelease,
        IssueType::FloatingVersionRelease,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::AmbiguousVersion => "ambiguous_version",
            IssueType::WrongRefType => "wrong_ref_type",
            IssueType::MissingMajorVersion => "missing_major_version",
            IssueType::IncorrectVersion => "incorrect_version",
            IssueType::MissingMinorVersion => "missing_minor_version",
            IssueType::IncorrectMinorVersion => "incorrect_minor_version",
            IssueType::IncorrectLatest => "incorrect_latest",
            IssueType::MissingRelease => "missing_release",
            IssueType::DraftRelease => "draft_release",
            IssueType::NonImmutableRelease => "non_immutable_release",
            IssueType::FloatingVersionRelease => "floating_version_release",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown issue type '{0}'")]
pub struct UnknownIssueType(pub String);

impl FromStr for IssueType {
    type Err = UnknownIssueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace('-', "_").to_ascii_lowercase();
        IssueType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| UnknownIssueType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an issue within one run.
///
/// Every state except `Pending` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Pending,
    Fixed,
    Failed,
    Unfixable,
    ManualFixRequired,
}

impl IssueStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, IssueStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Pending => "pending",
            IssueStatus::Fixed => "fixed",
            IssueStatus::Failed => "failed",
            IssueStatus::Unfixable => "unfixable",
            IssueStatus::ManualFixRequired => "manual_fix_required",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("issue {issue_id}: cannot move from terminal status {from} to {to}")]
pub struct StatusError {
    pub issue_id: String,
    pub from: IssueStatus,
    pub to: IssueStatus,
}

/// Result of one sub-operation of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: String,
    pub succeeded: bool,

    #[serde(default)]
    pub attempts: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One detected defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// `<type>:<version>`, used as the dependency handle.
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_sha: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_sha: Option<String>,

    #[serde(default)]
    status: IssueStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation_action: Option<RemediationAction>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepOutcome>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manual_commands: Vec<String>,
}

impl ValidationIssue {
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        version: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let version = version.into();
        Self {
            id: Self::make_id(issue_type, &version),
            issue_type,
            severity,
            message: message.into(),
            version,
            current_sha: None,
            expected_sha: None,
            status: IssueStatus::Pending,
            remediation_action: None,
            dependencies: Vec::new(),
            status_message: None,
            steps: Vec::new(),
            manual_commands: Vec::new(),
        }
    }

    pub fn make_id(issue_type: IssueType, version: &str) -> String {
        format!("{}:{}", issue_type.as_str(), version)
    }

    pub fn with_current_sha(mut self, sha: impl Into<String>) -> Self {
        self.current_sha = Some(sha.into());
        self
    }

    pub fn with_expected_sha(mut self, sha: impl Into<String>) -> Self {
        self.expected_sha = Some(sha.into());
        self
    }

    pub fn with_action(mut self, action: RemediationAction) -> Self {
        self.remediation_action = Some(action);
        self
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
        self
    }

    pub fn status(&self) -> IssueStatus {
        self.status
    }

    /// Move to `to`. `Pending -> Pending` is a no-op; leaving a terminal state is an error.
    pub fn transition(&mut self, to: IssueStatus) -> Result<(), StatusError> {
        if self.status.is_terminal() {
            if self.status == to {
                return Ok(());
            }
            return Err(StatusError {
                issue_id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// True while the issue still counts against the run: pending or not fixed.
    pub fn is_unresolved(&self) -> bool {
        self.status != IssueStatus::Fixed
    }

    /// Stable UUID derived from the issue id.
    pub fn fingerprint(&self) -> Uuid {
        const NAMESPACE: Uuid = Uuid::from_bytes([
            0x9a, 0x41, 0x0c, 0x7e, 0x2f, 0x13, 0x4d, 0x6b, 0xb0, 0x58, 0x3e, 0x91, 0xc4, 0x27,
            0x05, 0xfa,
        ]);
        Uuid::new_v5(&NAMESPACE, self.id.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue() -> ValidationIssue {
        ValidationIssue::new(
            IssueType::IncorrectVersion,
            Severity::Error,
            "v1",
            "v1 points at the wrong commit",
        )
    }

    #[test]
    fn id_combines_type_and_version() {
        assert_eq!(issue().id, "incorrect_version:v1");
    }

    #[test]
    fn terminal_status_cannot_change() {
        let mut issue = issue();
        issue.transition(IssueStatus::Pending).unwrap();
        issue.transition(IssueStatus::Fixed).unwrap();
        let err = issue.transition(IssueStatus::Failed).unwrap_err();
        assert_eq!(err.from, IssueStatus::Fixed);
        assert_eq!(err.to, IssueStatus::Failed);
        assert_eq!(issue.status(), IssueStatus::Fixed);
        assert!(issue.transition(IssueStatus::Pending).is_err());
    }

    #[test]
    fn re_entering_same_terminal_status_is_allowed() {
        let mut issue = issue();
        issue.transition(IssueStatus::Unfixable).unwrap();
        issue.transition(IssueStatus::Unfixable).unwrap();
        assert_eq!(issue.status(), IssueStatus::Unfixable);
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(issue().fingerprint(), issue().fingerprint());
        let other = ValidationIssue::new(IssueType::IncorrectVersion, Severity::Error, "v2", "");
        assert_ne!(issue().fingerprint(), other.fingerprint());
    }

    #[test]
    fn issue_type_parses_both_spellings() {
        assert_eq!(
            "draft-release".parse::<IssueType>().unwrap(),
            IssueType::DraftRelease
        );
        assert_eq!(
            "non_immutable_release".parse::<IssueType>().unwrap(),
            IssueType::NonImmutableRelease
        );
        assert!("nope".parse::<IssueType>().is_err());
    }

    #[test]
    fn dependencies_are_deduplicated() {
        let issue = issue()
            .depends_on("wrong_ref_type:v1")
            .depends_on("wrong_ref_type:v1");
        assert_eq!(issue.dependencies, vec!["wrong_ref_type:v1".to_string()]);
    }
}
