use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    command: MdreplaceCommand,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the project in
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct RenderArgs {
    /// The content file to render
    file: PathBuf,

    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct ComponentsArgs {
    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Print what would be deleted without deleting it
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum MdreplaceCommand {
    /// Initialize a new project with a starter replace table
    Init(InitArgs),

    /// Build the site
    Build(BuildArgs),

    /// Render one content file to an HTML fragment on stdout
    Render(RenderArgs),

    /// List the resolved render overrides
    Components(ComponentsArgs),

    /// Delete the generated site
    Clean(CleanArgs),
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match args.command {
        MdreplaceCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        MdreplaceCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
        MdreplaceCommand::Render(args) => {
            commands::render::run(&args).await?;
        }
        MdreplaceCommand::Components(args) => {
            commands::components::run(&args).await?;
        }
        MdreplaceCommand::Clean(args) => {
            commands::clean::run(&args).await?;
        }
    }

    Ok(())
}
