// ABOUTME: Backup archiving: tars the data directory into work_dir/backups.
// ABOUTME: Runs locally; the backup reflects the state after a fresh manifest application.

use super::ExecError;
use crate::types::DeploymentName;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Subdirectory of the workspace that receives backup archives.
pub const BACKUP_DIR: &str = "backups";

/// Archive `work_dir/<data_dir>` into `work_dir/backups/<name>-<timestamp>.tar`.
///
/// Returns the archive path. The tar work is synchronous, so it runs on a
/// blocking task.
pub async fn archive_data_dir(
    work_dir: &Path,
    data_dir: &str,
    name: &DeploymentName,
) -> Result<PathBuf, ExecError> {
    let data_path = work_dir.join(data_dir);
    let backup_dir = work_dir.join(BACKUP_DIR);
    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let archive_path = backup_dir.join(format!("{name}-{timestamp}.tar"));

    tokio::fs::create_dir_all(&backup_dir)
        .await
        .map_err(|e| ExecError::Backup(format!("{}: {e}", backup_dir.display())))?;

    let data_dir_name = data_dir.to_string();
    let archive = archive_path.clone();
    tokio::task::spawn_blocking(move || -> Result<(), ExecError> {
        let file = std::fs::File::create(&archive)
            .map_err(|e| ExecError::Backup(format!("{}: {e}", archive.display())))?;
        let mut builder = tar::Builder::new(file);
        builder
            .append_dir_all(&data_dir_name, &data_path)
            .and_then(|_| builder.finish())
            .map_err(|e| ExecError::Backup(format!("{}: {e}", data_path.display())))
    })
    .await
    .map_err(|e| ExecError::Backup(format!("archive task panicked: {e}")))??;

    tracing::info!(archive = %archive_path.display(), "backup archived");
    Ok(archive_path)
}
