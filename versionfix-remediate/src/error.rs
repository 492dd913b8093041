//! Error types for versionfix-remediate.
//!
//! This module defines error types that distinguish between:
//! - Transport errors from the repository capability, split into retryable and non-retryable
//! - Structural conflicts, where the target can never be changed (e.g. an immutable release)
//! - Planning errors (fatal): dependency cycles and dangling dependencies

use thiserror::Error;
use versionfix_types::issue::StatusError;

/// Failure reported by a [`RepositoryPort`](crate::RepositoryPort) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("request timed out")]
    Timeout,

    #[error("connection reset")]
    ConnectionReset,

    #[error("http {status}: {message}")]
    Http { status: u16, message: String },

    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The target exists in a state that forbids the change.
    #[error("conflict: {message}")]
    Conflict { message: String },
}

impl RepoError {
    /// Timeouts, connection resets, HTTP 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            RepoError::Timeout | RepoError::ConnectionReset => true,
            RepoError::Http { status, .. } => *status == 429 || (500..600).contains(status),
            RepoError::Validation { .. } | RepoError::Conflict { .. } => false,
        }
    }

    /// Structural conflicts are reported as unfixable, not failed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepoError::Conflict { .. })
    }
}

/// Fatal errors raised while ordering remediation actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// Issue ids forming a cycle, first id repeated at the end.
    #[error("dependency cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("issue {issue} depends on unknown issue {dependency}")]
    UnknownDependency { issue: String, dependency: String },
}

/// The top-level error type for remediation runs.
#[derive(Debug, Error)]
pub enum RemediateError {
    #[error("planning failed: {0}")]
    Planning(#[from] PlanningError),

    /// An issue status was driven out of a terminal state.
    #[error("internal status error: {0}")]
    Status(#[from] StatusError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(RepoError::Timeout.is_retryable());
        assert!(RepoError::ConnectionReset.is_retryable());
        for status in [429, 500, 502, 503, 599] {
            let err = RepoError::Http {
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "{status}");
        }
        for status in [400, 401, 403, 404, 409, 422] {
            let err = RepoError::Http {
                status,
                message: String::new(),
            };
            assert!(!err.is_retryable(), "{status}");
        }
        assert!(
            !RepoError::Validation {
                message: "bad sha".into()
            }
            .is_retryable()
        );
        let conflict = RepoError::Conflict {
            message: "immutable".into(),
        };
        assert!(!conflict.is_retryable());
        assert!(conflict.is_conflict());
    }

    #[test]
    fn cycle_display_shows_path() {
        let err = PlanningError::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle: a -> b -> a");
    }
}
