// ABOUTME: Entry point for the stager CLI application.
// ABOUTME: Parses arguments, runs the launch pipeline, and maps the outcome to an exit code.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, OpArgs};
use stager::config::{self, Config};
use stager::context::Operation;
use stager::error::Result;
use stager::executor::DockerExecutor;
use stager::lifecycle::Launch;
use stager::output::{Output, OutputMode};
use stager::template::TemplateStore;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    if let Err(e) = run(cli, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &mut Output) -> Result<()> {
    match cli.command {
        Commands::Init { name, image, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, name.as_deref(), image.as_deref(), force)?;
            output.success("Configuration written");
            Ok(())
        }
        Commands::Start(args) => launch(Operation::Start, args, output).await,
        Commands::Stop(args) => launch(Operation::Stop, args, output).await,
        Commands::Restart(args) => launch(Operation::Restart, args, output).await,
        Commands::Backup(args) => launch(Operation::Backup, args, output).await,
    }
}

/// Run the full pipeline for one operation: load templates, prepare the
/// workspace, apply manifests, dispatch to the runtime, sweep staging files.
async fn launch(operation: Operation, args: OpArgs, output: &mut Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let config = Config::discover(&cwd)?;
    let context = config.into_context(operation, args.into_overrides());

    output.start_timer();

    // Loading templates before touching the workspace means a bad template
    // source fails the run without side effects.
    output.stage("Loading templates...");
    let store = TemplateStore::load(&context.template_source)?;

    output.stage("Preparing workspace...");
    let launch = Launch::new(context).prepare()?;

    output.stage("Applying manifests...");
    let launch = launch.apply(&store).await?;
    let applied = launch.report().applied().count();
    output.stage(&format!("Applied {applied} manifests"));

    output.stage(&format!("Executing {operation}..."));
    let executor = DockerExecutor::connect(launch.context())?;
    let launch = launch.execute(&executor).await?;

    launch.cleanup().await;

    output.success(&format!("Operation {operation} completed"));
    Ok(())
}
