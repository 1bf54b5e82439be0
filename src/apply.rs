// ABOUTME: Manifest applier: renders every manifest and writes it into the workspace.
// ABOUTME: Best-effort batch; one bad manifest never blocks the others, but every failure is reported.

use crate::context::Context;
use crate::template::{self, TemplateStore};
use crate::types::ManifestId;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Upper bound on concurrent render/write tasks within one batch.
pub const MAX_CONCURRENT_RENDERS: usize = 4;

/// Subdirectory of the workspace that staging files are written through
/// before being renamed into place. Disjoint from the manifest-id namespace
/// (ids cannot start with a dot), so no artifact can collide with a staging
/// path. Leftovers are swept wholesale by the cleanup stage.
pub const STAGING_DIR: &str = ".staging";

/// Why a single manifest failed to apply.
#[derive(Debug, Error)]
pub enum ApplyCause {
    #[error(transparent)]
    Template(#[from] template::TemplateError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of applying one manifest: the written path, or the cause.
#[derive(Debug)]
pub struct ManifestOutcome {
    pub manifest: ManifestId,
    pub result: Result<PathBuf, ApplyCause>,
}

/// One failed manifest inside an aggregate report.
#[derive(Debug)]
pub struct ManifestFailure {
    pub manifest: ManifestId,
    pub cause: ApplyCause,
}

/// Aggregate of every manifest that failed in a batch. The lifecycle
/// controller refuses to dispatch the runtime operation when this is raised.
#[derive(Debug)]
pub struct ManifestApplicationError {
    pub failures: Vec<ManifestFailure>,
    pub total: usize,
}

impl fmt::Display for ManifestApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} manifests failed to apply: ",
            self.failures.len(),
            self.total
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.manifest, failure.cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ManifestApplicationError {}

/// Ordered per-manifest outcomes for one batch, in the context's listed
/// manifest order regardless of task completion order.
#[derive(Debug)]
pub struct ApplyReport {
    outcomes: Vec<ManifestOutcome>,
}

impl ApplyReport {
    pub fn outcomes(&self) -> &[ManifestOutcome] {
        &self.outcomes
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_err())
    }

    /// Paths written successfully, in application order.
    pub fn applied(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Convert into a result: the report itself when every manifest applied,
    /// otherwise the aggregate error carrying every failure and its cause.
    pub fn into_result(self) -> Result<ApplyReport, ManifestApplicationError> {
        if !self.has_failures() {
            return Ok(self);
        }

        let total = self.outcomes.len();
        let failures = self
            .outcomes
            .into_iter()
            .filter_map(|o| match o.result {
                Ok(_) => None,
                Err(cause) => Some(ManifestFailure {
                    manifest: o.manifest,
                    cause,
                }),
            })
            .collect();

        Err(ManifestApplicationError { failures, total })
    }
}

/// Apply every manifest in the context, in listed order.
///
/// Rendering and writing run concurrently, bounded by
/// [`MAX_CONCURRENT_RENDERS`]; each manifest writes a distinct target path
/// and `buffered` yields outcomes in input order, so the report is
/// deterministic. A failure for one manifest is recorded as that manifest's
/// outcome and does not abort the rest of the batch.
pub async fn apply_manifests(store: &TemplateStore, context: &Context) -> ApplyReport {
    let limit = context.manifests.len().min(MAX_CONCURRENT_RENDERS);
    let staging_dir = context.work_dir.join(STAGING_DIR);

    if let Err(source) = tokio::fs::create_dir_all(&staging_dir).await {
        // Staging is a precondition for every write; fail the whole batch.
        let outcomes = context
            .manifests
            .iter()
            .map(|manifest| ManifestOutcome {
                manifest: manifest.clone(),
                result: Err(ApplyCause::Write {
                    path: staging_dir.clone(),
                    source: std::io::Error::new(source.kind(), source.to_string()),
                }),
            })
            .collect();
        return ApplyReport { outcomes };
    }

    let outcomes = stream::iter(context.manifests.iter())
        .map(|manifest| async move {
            let result = apply_one(store, context, manifest).await;
            if let Err(ref cause) = result {
                tracing::warn!(manifest = %manifest, error = %cause, "manifest failed to apply");
            }
            ManifestOutcome {
                manifest: manifest.clone(),
                result,
            }
        })
        .buffered(limit)
        .collect::<Vec<_>>()
        .await;

    ApplyReport { outcomes }
}

/// Render one manifest and write it through a staging file.
///
/// The rename makes the final path either the old artifact or the complete
/// new one; a killed process leaves at worst a file under the staging
/// directory, never a half-written artifact.
async fn apply_one(
    store: &TemplateStore,
    context: &Context,
    manifest: &ManifestId,
) -> Result<PathBuf, ApplyCause> {
    let template = store.lookup(manifest)?;
    let rendered = template::render(template, &context.template_vars(manifest))?;

    let target = context.artifact_path(manifest);
    let staging = context.work_dir.join(STAGING_DIR).join(manifest.as_str());

    tokio::fs::write(&staging, rendered.as_bytes())
        .await
        .map_err(|source| ApplyCause::Write {
            path: staging.clone(),
            source,
        })?;
    tokio::fs::rename(&staging, &target)
        .await
        .map_err(|source| ApplyCause::Write {
            path: target.clone(),
            source,
        })?;

    tracing::debug!(manifest = %manifest, path = %target.display(), "manifest applied");
    Ok(target)
}
