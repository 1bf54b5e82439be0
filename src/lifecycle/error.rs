// ABOUTME: Error type for lifecycle stage transitions.
// ABOUTME: Names the failing stage and carries the full underlying causes.

use crate::apply::ManifestApplicationError;
use crate::executor::{ExecError, Verb};
use crate::workspace::WorkspaceError;

/// Errors that halt the launch pipeline.
///
/// The controller is the single point deciding what is fatal: workspace and
/// executor failures always are; manifest failures arrive pre-aggregated so
/// every cause is visible, not just the first.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Workspace preparation failed.
    #[error("workspace preparation failed: {0}")]
    Workspace(#[from] WorkspaceError),

    /// One or more manifests failed to apply.
    #[error("manifest application failed: {0}")]
    Apply(#[from] ManifestApplicationError),

    /// The runtime executor reported a failure for a verb.
    #[error("operation '{verb}' failed: {source}")]
    Operation {
        verb: Verb,
        #[source]
        source: ExecError,
    },
}
