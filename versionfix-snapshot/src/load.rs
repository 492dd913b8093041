use crate::model::Snapshot;
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SnapshotLoadError {
    #[error("io error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("json parse error in {path}: {message}")]
    Json { path: String, message: String },
}

/// Parse snapshot JSON. `origin` only labels errors.
pub fn parse_snapshot(origin: &str, contents: &str) -> Result<Snapshot, SnapshotLoadError> {
    serde_json::from_str::<Snapshot>(contents).map_err(|e| SnapshotLoadError::Json {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

pub fn load_snapshot(path: &Utf8Path) -> Result<Snapshot, SnapshotLoadError> {
    debug!(path = %path, "loading snapshot");
    let contents = fs::read_to_string(path).map_err(|e| SnapshotLoadError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    let snapshot = parse_snapshot(path.as_str(), &contents)?;
    debug!(
        tags = snapshot.tags.len(),
        branches = snapshot.branches.len(),
        releases = snapshot.releases.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Pretty JSON with a trailing newline, the on-disk form.
pub fn snapshot_to_json(snapshot: &Snapshot) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(snapshot).context("serialize snapshot")?;
    json.push('\n');
    Ok(json)
}

pub fn save_snapshot(path: &Utf8Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    fs::write(path, snapshot_to_json(snapshot)?).with_context(|| format!("write {}", path))?;
    Ok(())
}
