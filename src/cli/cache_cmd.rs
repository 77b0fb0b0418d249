//! Cache CLI commands

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::session::Session;
use crate::storage::Project;

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Rebuild the cache from blogs.jsonl
    Rebuild,

    /// Show cache status
    Status,
}

pub fn run(cmd: CacheCommands, session: &Session) -> Result<()> {
    match cmd {
        CacheCommands::Rebuild => rebuild(session),
        CacheCommands::Status => status(session),
    }
}

fn rebuild(session: &Session) -> Result<()> {
    let project = Project::open_current()?;

    let start = std::time::Instant::now();
    project.rebuild_cache()?;
    let duration = start.elapsed();

    let counts = project.cache()?.status_counts()?;

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "rebuilt": true,
            "duration_ms": duration.as_millis(),
            "blogs": counts.total(),
        }));
    } else {
        session.output.success(&format!(
            "Cache rebuilt in {:?} ({} blogs)",
            duration,
            counts.total()
        ));
    }

    Ok(())
}

fn status(session: &Session) -> Result<()> {
    let project = Project::open_current()?;
    let cache = project.cache()?;

    let is_stale = cache.is_stale()?;
    let last_rebuild = cache.last_rebuild()?.map(DateTime::<Utc>::from);
    let counts = cache.status_counts()?;

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "path": cache.path().display().to_string(),
            "stale": is_stale,
            "last_rebuild": last_rebuild,
            "blogs": counts,
        }));
        return Ok(());
    }

    println!("Cache Status");
    println!("{}", "=".repeat(40));
    println!("Path: {}", cache.path().display());
    println!(
        "Status: {}",
        if is_stale {
            "STALE (needs rebuild)"
        } else {
            "fresh"
        }
    );
    match last_rebuild {
        Some(at) => println!("Last rebuild: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last rebuild: never"),
    }
    println!();
    println!(
        "Cached blogs: {} ({} published, {} draft)",
        counts.total(),
        counts.published,
        counts.draft
    );

    if is_stale {
        println!();
        println!("Run 'learnpath cache rebuild' to update the cache.");
    }

    Ok(())
}
