//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use versionfix_snapshot::Snapshot;

pub use versionfix_remediate::RepositoryPort;

/// Source of collected repository state.
pub trait StateSource {
    fn load_snapshot(&self) -> anyhow::Result<Snapshot>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
