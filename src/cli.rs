// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: One subcommand per lifecycle operation plus init.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stager")]
#[command(about = "Render manifest templates and drive container lifecycle operations")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress output (CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stager.yml configuration file
    Init {
        /// Deployment name
        #[arg(short, long)]
        name: Option<String>,

        /// Container image
        #[arg(short, long)]
        image: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Render manifests and start the deployment
    Start(OpArgs),

    /// Render manifests and stop the deployment
    Stop(OpArgs),

    /// Stop, then start against the same manifest set
    Restart(OpArgs),

    /// Re-render manifests and archive the data directory
    Backup(OpArgs),
}

/// Shared flags for the lifecycle subcommands.
#[derive(Args)]
pub struct OpArgs {
    /// Working directory override
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Data subdirectory override
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Template source directory override
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

impl OpArgs {
    pub fn into_overrides(self) -> stager::config::Overrides {
        stager::config::Overrides {
            work_dir: self.work_dir,
            data_dir: self.data_dir,
            templates: self.templates,
        }
    }
}
