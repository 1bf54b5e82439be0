// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording stub executor and context builders for integration tests.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

use async_trait::async_trait;
use nonempty::NonEmpty;
use stager::context::{Context, Operation};
use stager::executor::{ExecError, Executor, Verb};
use stager::types::{DeploymentName, ManifestId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// A recorded executor invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub work_dir: PathBuf,
    pub manifests: Vec<ManifestId>,
    pub verb: Verb,
}

/// Executor stub that records every call and optionally fails on one verb.
pub struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    fail_on: Option<Verb>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(verb: Verb) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(verb),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn verbs(&self) -> Vec<Verb> {
        self.calls().iter().map(|c| c.verb).collect()
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(
        &self,
        work_dir: &Path,
        manifests: &[ManifestId],
        verb: Verb,
    ) -> Result<(), ExecError> {
        self.calls.lock().unwrap().push(Call {
            work_dir: work_dir.to_path_buf(),
            manifests: manifests.to_vec(),
            verb,
        });

        if self.fail_on == Some(verb) {
            return Err(ExecError::Container(format!("injected {verb} failure")));
        }
        Ok(())
    }
}

/// Build a context rooted at `work_dir` with the given manifests.
pub fn context_with_manifests(
    work_dir: &Path,
    operation: Operation,
    manifests: &[&str],
) -> Context {
    let manifests: Vec<ManifestId> = manifests
        .iter()
        .map(|m| ManifestId::new(m).unwrap())
        .collect();

    Context {
        name: DeploymentName::new("web-stack").unwrap(),
        work_dir: work_dir.to_path_buf(),
        data_dir: "data".to_string(),
        template_source: work_dir.join("templates"),
        manifests: NonEmpty::from_vec(manifests).unwrap(),
        operation,
        image: "nginx:latest".to_string(),
        stop_timeout: Duration::from_secs(5),
        vars: HashMap::new(),
    }
}
