//! Shared DTOs for the versionfix workspace.
//!
//! # Design constraints
//! - These types are serialized into reports and snapshots.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod action;
pub mod config;
pub mod issue;
pub mod refs;
pub mod release;
pub mod report;
pub mod state;
pub mod summary;

/// Schema identifiers.
pub mod schema {
    pub const VERSIONFIX_REPORT_V1: &str = "versionfix.report.v1";
    pub const VERSIONFIX_SNAPSHOT_V1: &str = "versionfix.snapshot.v1";
}
