// ABOUTME: Application-wide error types for stager.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::context::UnknownOperation;
use crate::executor::ExecError;
use crate::lifecycle::LaunchError;
use crate::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    UnknownOperation(#[from] UnknownOperation),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Executor(#[from] ExecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
