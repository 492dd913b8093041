//! Remediation for versionfix issues.
//!
//! Responsibilities:
//! - Order actions by priority and explicit dependencies.
//! - Render the manual command list for each action.
//! - Execute actions through a [`RepositoryPort`] with retry and backoff, settling each issue's status.

pub mod commands;
pub mod error;
pub mod executor;
pub mod planner;
pub mod port;
pub mod retry;

pub use commands::manual_commands;
pub use error::{PlanningError, RemediateError, RepoError};
pub use executor::{auto_fix, render_manual};
pub use planner::plan_order;
pub use port::RepositoryPort;
pub use retry::{
    with_retry, Attempted, BackoffPolicy, RecordingSleeper, RetryPolicy, Sleeper, ThreadSleeper,
};
