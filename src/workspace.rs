// ABOUTME: Workspace preparation: ensures the working directory tree exists.
// ABOUTME: Idempotent; already-existing directories are never an error.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to create workspace directory {}: {source}", path.display())]
pub struct WorkspaceError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Create `work_dir` and `work_dir/<data_dir>`, including any missing
/// intermediate directories. Succeeds silently if they already exist; errors
/// only on permission or I/O failure. Later pipeline stages assume both
/// directories exist.
pub fn prepare(work_dir: &Path, data_dir: &str) -> Result<(), WorkspaceError> {
    let data_path = work_dir.join(data_dir);

    // create_dir_all covers work_dir itself; kept as two calls so the error
    // names the path that actually failed.
    std::fs::create_dir_all(work_dir).map_err(|source| WorkspaceError {
        path: work_dir.to_path_buf(),
        source,
    })?;
    std::fs::create_dir_all(&data_path).map_err(|source| WorkspaceError {
        path: data_path.clone(),
        source,
    })?;

    tracing::debug!(work_dir = %work_dir.display(), data_dir, "workspace prepared");
    Ok(())
}
