// ABOUTME: Tests for the backup archiver.
// ABOUTME: Verifies archive placement, naming, and content without a container runtime.

use stager::executor::archive_data_dir;
use stager::types::DeploymentName;

#[tokio::test]
async fn archives_the_data_directory_into_backups() {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("data");
    std::fs::create_dir_all(data.join("pg")).unwrap();
    std::fs::write(data.join("pg").join("dump.sql"), "select 1;").unwrap();

    let name = DeploymentName::new("web-stack").unwrap();
    let archive = archive_data_dir(root.path(), "data", &name).await.unwrap();

    assert!(archive.is_file());
    assert!(archive.starts_with(root.path().join("backups")));
    let filename = archive.file_name().unwrap().to_string_lossy().into_owned();
    assert!(filename.starts_with("web-stack-"));
    assert!(filename.ends_with(".tar"));

    // The archive holds the data tree under the data dir name.
    let file = std::fs::File::open(&archive).unwrap();
    let mut reader = tar::Archive::new(file);
    let entries: Vec<String> = reader
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().display().to_string())
        .collect();
    assert!(entries.iter().any(|p| p.contains("pg/dump.sql")));
}

#[tokio::test]
async fn missing_data_directory_is_a_backup_error() {
    let root = tempfile::tempdir().unwrap();
    let name = DeploymentName::new("web-stack").unwrap();

    let err = archive_data_dir(root.path(), "data", &name)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("backup failed"));
}
