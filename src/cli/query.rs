//! Query commands (popular, search, status)
//!
//! Search and status read the SQLite cache, rebuilding it when stale.

use anyhow::Result;
use tracing::debug;

use super::output::truncate;
use super::session::Session;
use crate::domain::{popular as rank_popular, Category};
use crate::storage::Project;

/// Show the most popular published posts
pub fn popular(session: &Session, limit: Option<usize>) -> Result<()> {
    let project = Project::open_current()?;
    let limit = limit.unwrap_or(project.config().project.popular_limit);

    let blogs = project.blog_store().read_all()?;
    let top = rank_popular(blogs.values(), limit);
    debug!(limit, found = top.len(), "ranked popular blogs");

    if session.output.is_json() {
        let items: Vec<_> = top
            .iter()
            .map(|b| {
                serde_json::json!({
                    "id": b.id,
                    "title": b.title,
                    "category": b.category,
                    "author": b.author,
                    "views": b.views,
                    "likes_count": b.likes_count(),
                })
            })
            .collect();
        session.output.data(&items);
    } else if top.is_empty() {
        println!("No published blogs yet.");
    } else {
        println!("Popular blogs ({}):", top.len());
        println!("{:<10} {:>6} {:>6} TITLE", "ID", "VIEWS", "LIKES");
        println!("{}", "-".repeat(60));
        for blog in top {
            println!(
                "{:<10} {:>6} {:>6} {}",
                blog.id,
                blog.views,
                blog.likes_count(),
                truncate(&blog.title, 40)
            );
        }
    }

    Ok(())
}

/// Search published posts using the SQLite cache
pub fn search(session: &Session, query: &str) -> Result<()> {
    let project = Project::open_current()?;

    let cache = project.get_or_rebuild_cache()?;
    let results = cache.search(query)?;
    debug!(query, found = results.len(), "searched cache");

    if session.output.is_json() {
        session.output.data(&results);
    } else if results.is_empty() {
        println!("No results found for '{}'", query);
    } else {
        println!("Search results for '{}':", query);
        println!("{:<10} {:<12} TITLE", "ID", "CATEGORY");
        println!("{}", "-".repeat(70));

        for result in &results {
            println!("{:<10} {:<12} {}", result.id, result.category, result.title);

            if !result.snippet.is_empty() && result.snippet != result.title {
                // Bold the matched terms for the terminal
                let snippet = result
                    .snippet
                    .replace("<mark>", "\x1b[1m")
                    .replace("</mark>", "\x1b[0m");
                println!("           {}", snippet);
            }
        }

        println!();
        println!("Found {} result(s)", results.len());
    }

    Ok(())
}

/// Show catalog status overview
pub fn status(session: &Session) -> Result<()> {
    let project = Project::open_current()?;
    let cache = project.get_or_rebuild_cache()?;

    let counts = cache.status_counts()?;
    let by_category = cache.category_counts()?;
    let total_views = cache.total_views()?;
    let actor = session.actor();

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "blogs": {
                "total": counts.total(),
                "draft": counts.draft,
                "published": counts.published,
            },
            "categories": by_category,
            "views": total_views,
            "user": actor.map(|a| serde_json::json!({
                "name": a.name,
                "role": a.role,
            })),
        }));
        return Ok(());
    }

    println!("Catalog Status");
    println!("{}", "=".repeat(40));
    println!();
    println!(
        "Blogs: {} total ({} published, {} draft)",
        counts.total(),
        counts.published,
        counts.draft
    );
    println!("Views: {}", total_views);

    if counts.published > 0 {
        println!();
        println!("Published by category:");
        for category in Category::all() {
            let count = by_category.get(category.as_str()).copied().unwrap_or(0);
            println!("  {:<12} {}", category, count);
        }
    }

    println!();
    match actor {
        Some(actor) => println!("Acting as: {} ({})", actor.name, actor.role),
        None => println!("Acting as: anonymous (set [user] name in config or pass --as)"),
    }

    Ok(())
}
