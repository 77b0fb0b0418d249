//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::session::Session;
use super::{blog, cache_cmd, course, path, query};
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "learnpath")]
#[command(author, version, about = "Local-first blog catalog with learning path generation")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Act as this user for this invocation
    #[arg(long = "as", global = true, value_name = "USER")]
    pub as_user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new learnpath project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage blog posts
    #[command(subcommand)]
    Blog(blog::BlogCommands),

    /// Manage courses and enrollment
    #[command(subcommand)]
    Course(course::CourseCommands),

    /// Show the most popular published posts
    Popular {
        /// Number of posts to show (defaults to popular_limit in config)
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Full-text search over published posts
    Search {
        /// Search query (SQLite FTS5 syntax)
        query: String,
    },

    /// Generate a learning path
    ///
    /// Examples:
    ///   learnpath path Programming
    ///   learnpath path Programming rust --level advanced --budget long
    Path(path::PathArgs),

    /// Show catalog status overview
    Status,

    /// Manage the SQLite cache
    #[command(subcommand)]
    Cache(cache_cmd::CacheCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or(config.global.default_format);
    let actor = config.resolve_actor(cli.as_user.as_deref());
    debug!(
        actor = ?actor.as_ref().map(|a| a.name.as_str()),
        project = ?config.project_root,
        "resolved session"
    );

    let session = Session::new(Output::new(format), actor);

    match cli.command {
        Commands::Init { path } => {
            debug!(path = %path, "initializing project");
            let project = Project::init(&path)?;
            session.output.success(&format!(
                "Initialized learnpath project at {}",
                project.root().display()
            ));
        }

        Commands::Blog(cmd) => blog::run(cmd, &session)?,
        Commands::Course(cmd) => course::run(cmd, &session)?,

        Commands::Popular { limit } => query::popular(&session, limit)?,
        Commands::Search { query } => query::search(&session, &query)?,
        Commands::Path(args) => path::run(args, &session)?,
        Commands::Status => query::status(&session)?,

        Commands::Cache(cmd) => cache_cmd::run(cmd, &session)?,
    }

    debug!("command completed");
    Ok(())
}

/// Sends tracing events to stderr
///
/// `--verbose` turns on debug events for this crate; otherwise `RUST_LOG`
/// decides, defaulting to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("learnpath_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be set when embedded; keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
