// ABOUTME: Runtime executor boundary: the collaborator that performs container actions.
// ABOUTME: The core hands over (work dir, manifest set, verb); the wire protocol is the executor's concern.

mod backup;
mod docker;

pub use backup::archive_data_dir;
pub use docker::DockerExecutor;

use crate::types::ManifestId;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// The concrete action an executor performs. Restart is not a verb: the
/// lifecycle controller composes it from `Stop` then `Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Start,
    Stop,
    Backup,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Start => "start",
            Verb::Stop => "stop",
            Verb::Backup => "backup",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from executor operations.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("runtime connection failed: {0}")]
    Connection(String),

    #[error("image pull failed: {0}")]
    ImagePull(String),

    #[error("container operation failed: {0}")]
    Container(String),

    #[error("backup failed: {0}")]
    Backup(String),
}

/// Performs the actual container action for one deployment.
///
/// The call is blocking from the controller's point of view: no verb is
/// issued until the manifest report is fully collected, and the result is
/// awaited before the pipeline advances.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(
        &self,
        work_dir: &Path,
        manifests: &[ManifestId],
        verb: Verb,
    ) -> Result<(), ExecError>;
}
