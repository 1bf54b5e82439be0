// ABOUTME: State transition methods for the launch pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::marker::PhantomData;

use crate::apply::{self, STAGING_DIR};
use crate::executor::{Executor, Verb};
use crate::template::TemplateStore;
use crate::workspace;

use super::Launch;
use super::error::LaunchError;
use super::state::{Applied, Executed, Initialized, Prepared};

impl<S> Launch<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self) -> Launch<T> {
        Launch {
            context: self.context,
            report: self.report,
            _state: PhantomData,
        }
    }
}

// =============================================================================
// Initialized -> Prepared
// =============================================================================

impl Launch<Initialized> {
    /// Ensure the working directory tree exists.
    ///
    /// Idempotent: a second call on the same workspace succeeds without
    /// changing the tree.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Workspace` on permission or I/O failure.
    #[must_use = "launch state must be used"]
    pub fn prepare(self) -> Result<Launch<Prepared>, LaunchError> {
        workspace::prepare(&self.context.work_dir, &self.context.data_dir)?;
        Ok(self.transition())
    }
}

// =============================================================================
// Prepared -> Applied
// =============================================================================

impl Launch<Prepared> {
    /// Render and write every manifest in listed order.
    ///
    /// The batch is best-effort: one bad manifest does not block the others.
    /// The pipeline only advances when every manifest applied; otherwise the
    /// aggregate error carries each failing manifest and its cause.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Apply` when any manifest failed.
    #[must_use = "launch state must be used"]
    pub async fn apply(self, store: &TemplateStore) -> Result<Launch<Applied>, LaunchError> {
        let report = apply::apply_manifests(store, &self.context).await;
        let report = report.into_result()?;

        Ok(Launch {
            context: self.context,
            report: Some(report),
            _state: PhantomData,
        })
    }
}

// =============================================================================
// Applied -> Executed
// =============================================================================

impl Launch<Applied> {
    /// Dispatch the requested operation to the runtime executor.
    ///
    /// Restart is stop followed by start against the same manifest set; a
    /// stop failure fails the restart without attempting start. Backup runs
    /// against the freshly applied manifests, never stale files.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Operation` naming the failing verb.
    #[must_use = "launch state must be used"]
    pub async fn execute<E: Executor>(self, executor: &E) -> Result<Launch<Executed>, LaunchError> {
        use crate::context::Operation;

        let manifests: Vec<_> = self.context.manifests.iter().cloned().collect();
        let work_dir = self.context.work_dir.as_path();

        let verbs: &[Verb] = match self.context.operation {
            Operation::Start => &[Verb::Start],
            Operation::Stop => &[Verb::Stop],
            Operation::Restart => &[Verb::Stop, Verb::Start],
            Operation::Backup => &[Verb::Backup],
        };

        for &verb in verbs {
            executor
                .execute(work_dir, &manifests, verb)
                .await
                .map_err(|source| LaunchError::Operation { verb, source })?;
        }

        Ok(self.transition())
    }
}

// =============================================================================
// Executed - Terminal State
// =============================================================================

impl Launch<Executed> {
    /// Remove the staging directory and any leftover files inside it.
    ///
    /// Only the staging directory is touched; rendered artifacts share the
    /// workspace but live outside it. Best-effort post-success housekeeping:
    /// failures are logged and never flip the completed launch back to failed.
    pub async fn cleanup(&self) {
        let staging = self.context.work_dir.join(STAGING_DIR);

        if let Err(e) = tokio::fs::remove_dir_all(&staging).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %staging.display(),
                    error = %e,
                    "could not remove staging directory"
                );
            }
        }
    }
}
