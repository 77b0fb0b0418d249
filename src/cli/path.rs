//! Learning path command

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::debug;

use super::output::truncate;
use super::session::Session;
use crate::domain::{generate, Blog, GenerationRequest, GenerationResult, Level, TimeBudget};
use crate::storage::Project;

#[derive(Args)]
pub struct PathArgs {
    /// Topics to study: category names or tags, matched exactly
    pub topics: Vec<String>,

    /// Experience level: beginner, intermediate or advanced
    #[arg(long, short = 'l')]
    pub level: Option<String>,

    /// Time budget: short (2h), medium (4h) or long (6h)
    #[arg(long, short = 'b')]
    pub budget: Option<String>,
}

/// JSON shape of a generated path
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PathResponse<'a> {
    success: bool,
    level: &'a Level,
    time_budget: TimeBudget,
    #[serde(flatten)]
    result: &'a GenerationResult<&'a Blog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

pub fn run(args: PathArgs, session: &Session) -> Result<()> {
    // Reject a bad budget before touching the project
    let budget = args
        .budget
        .as_deref()
        .map(str::parse::<TimeBudget>)
        .transpose()?;

    let project = Project::open_current()?;
    let settings = &project.config().project;

    let level = args
        .level
        .as_deref()
        .map(Level::from)
        .unwrap_or_else(|| settings.default_level.clone());
    let request = GenerationRequest::new(
        args.topics,
        level,
        budget.unwrap_or(settings.default_budget),
    );
    request.validate()?;

    let mut blogs = project.blog_store().read_ordered()?;
    if settings.published_only {
        blogs.retain(Blog::is_published);
    }
    debug!(
        candidates = blogs.len(),
        published_only = settings.published_only,
        "loaded path candidates"
    );

    let result = generate(&blogs, &request)?;

    if session.output.is_json() {
        session.output.data(&PathResponse {
            success: true,
            level: &request.level,
            time_budget: request.time_budget,
            result: &result,
            message: result.message(),
        });
        return Ok(());
    }

    if let Some(message) = result.message() {
        println!("{}", message);
        return Ok(());
    }

    println!(
        "Learning path for {} ({} level, {} budget: {}h)",
        request.selected_topics.join(", "),
        request.level,
        request.time_budget,
        result.target_hours()
    );
    println!(
        "{:<4} {:<8} {:<10} {:<12} TITLE",
        "#", "HOURS", "ID", "CATEGORY"
    );
    println!("{}", "-".repeat(70));

    for entry in result.entries() {
        let blog = entry.item();
        println!(
            "{:<4} {:<8.2} {:<10} {:<12} {}",
            entry.order(),
            entry.estimated_hours(),
            blog.id,
            blog.category,
            truncate(&blog.title, 40)
        );
    }

    println!();
    println!(
        "Total: {:.2}h of {}h ({} of {} matching posts)",
        result.accumulated_hours(),
        result.target_hours(),
        result.entries().len(),
        result.matched()
    );

    Ok(())
}
