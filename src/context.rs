// ABOUTME: The immutable per-invocation deployment context and the operation enum.
// ABOUTME: Built once from config plus CLI overrides; no component reads ambient state.

use crate::types::{DeploymentName, ManifestId};
use nonempty::NonEmpty;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// The requested lifecycle operation. Closed set; anything else is rejected
/// at parse time, before the pipeline touches the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Stop,
    Restart,
    Backup,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown operation '{operation}' (expected start, stop, restart or backup)")]
pub struct UnknownOperation {
    pub operation: String,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Restart => "restart",
            Operation::Backup => "backup",
        }
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Operation::Start),
            "stop" => Ok(Operation::Stop),
            "restart" => Ok(Operation::Restart),
            "backup" => Ok(Operation::Backup),
            other => Err(UnknownOperation {
                operation: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved deployment parameters for one invocation.
///
/// Constructed once at process start and immutable afterwards. Every
/// component receives this by reference; if two operations must run, each
/// gets its own `Context`.
#[derive(Debug, Clone)]
pub struct Context {
    /// Deployment name, used for container naming and backup prefixes.
    pub name: DeploymentName,
    /// Root of generated artifacts. Created before any write.
    pub work_dir: PathBuf,
    /// Subdirectory of `work_dir` holding runtime data.
    pub data_dir: String,
    /// Directory template bodies are loaded from.
    pub template_source: PathBuf,
    /// Ordered manifest identifiers; applied in listed order.
    pub manifests: NonEmpty<ManifestId>,
    /// The requested lifecycle operation.
    pub operation: Operation,
    /// Container image the executor runs.
    pub image: String,
    /// Grace period the executor allows a container to stop.
    pub stop_timeout: Duration,
    /// Manifest-specific template fields, merged into placeholder bindings.
    pub vars: HashMap<String, String>,
}

impl Context {
    /// Combined `work_dir/data_dir` path.
    pub fn data_path(&self) -> PathBuf {
        self.work_dir.join(&self.data_dir)
    }

    /// Target path for a manifest's rendered artifact.
    pub fn artifact_path(&self, manifest: &ManifestId) -> PathBuf {
        self.work_dir.join(manifest.as_str())
    }

    /// Placeholder bindings for rendering one manifest.
    ///
    /// Built-in fields use the template contract's names (`workDir`,
    /// `dataDir`, `operation`, `manifest`); user vars cannot shadow them.
    pub fn template_vars(&self, manifest: &ManifestId) -> HashMap<String, String> {
        let mut vars = self.vars.clone();
        vars.insert("workDir".to_string(), path_display(&self.work_dir));
        vars.insert("dataDir".to_string(), self.data_dir.clone());
        vars.insert("operation".to_string(), self.operation.to_string());
        vars.insert("manifest".to_string(), manifest.to_string());
        vars
    }
}

fn path_display(path: &Path) -> String {
    path.display().to_string()
}
