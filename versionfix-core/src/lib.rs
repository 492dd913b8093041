//! Embeddable core library for versionfix.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into a release workflow or other host process.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`StateSource`](ports::StateSource): load the collected repository snapshot
//! - [`RepositoryPort`](ports::RepositoryPort): mutate refs and releases during auto-fix
//! - [`WritePort`](ports::WritePort): write files and create directories
//!
//! The [`adapters`] module provides filesystem-backed sources and writers, plus a
//! snapshot-backed repository used for offline auto-fix.
//!
//! # Entry points
//!
//! - [`run_check`](pipeline::run_check): evaluate rules, remediate, build the report
//! - [`write_check_artifacts`](pipeline::write_check_artifacts): write `report.json` and `summary.md`

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the pieces embedders need so they don't depend on the inner crates directly.
pub use versionfix_domain::{RuleMeta, builtin_rule_metas};
pub use versionfix_remediate::{RecordingSleeper, RetryPolicy, Sleeper, ThreadSleeper};
pub use versionfix_snapshot::{Snapshot, SnapshotLoadError};
