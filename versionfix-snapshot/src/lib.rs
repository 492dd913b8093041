//! Snapshot ingestion.
//!
//! A snapshot is the collected view of a repository's tags, branches and releases. The loader is
//! tolerant: unknown fields are ignored and optional flags default to `false`, so snapshots
//! exported by other tools can be consumed without a schema step.

mod load;
mod model;

pub use load::{
    SnapshotLoadError, load_snapshot, parse_snapshot, save_snapshot, snapshot_to_json,
};
pub use model::{Snapshot, SnapshotRef, SnapshotRelease};
