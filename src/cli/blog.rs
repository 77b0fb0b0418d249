//! Blog CLI commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use tracing::debug;

use super::output::truncate;
use super::session::Session;
use crate::domain::{list, Blog, BlogId, BlogStatus, Category, ListQuery, SortKey};
use crate::storage::{read_markdown_file, render_markdown, write_markdown_file, Project};

#[derive(Subcommand)]
pub enum BlogCommands {
    /// Create a draft post (or publish it right away with --publish)
    ///
    /// Examples:
    ///   learnpath blog add "Intro to Rust" --category Programming --file intro.md
    ///   learnpath blog add "Resume tips" -c Career --content "Keep it short." --tag jobs
    Add {
        /// Post title
        title: String,

        /// Category: Technology, Education, Programming, Career or Other
        #[arg(long, short = 'c')]
        category: String,

        /// Post body
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,

        /// Read the post body from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Tag (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Publish immediately
        #[arg(long)]
        publish: bool,

        /// Mark as featured
        #[arg(long)]
        featured: bool,

        /// Cover image URL or path
        #[arg(long)]
        cover_image: Option<String>,
    },

    /// Import a post from a markdown file with YAML frontmatter
    Import {
        /// Markdown file
        file: PathBuf,
    },

    /// Export a post as markdown with YAML frontmatter
    Export {
        /// Blog ID
        id: String,

        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List posts
    List {
        /// Only posts in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Include drafts
        #[arg(long)]
        drafts: bool,

        /// Sort order: -created (default), created, title or -views
        #[arg(long, short = 's', allow_hyphen_values = true)]
        sort: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Posts per page (defaults to page_size in config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a post (counts as a view)
    Show {
        /// Blog ID
        id: String,
    },

    /// Edit a post you wrote
    Edit {
        /// Blog ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// New body
        #[arg(long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the new body from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Replace the tags (repeatable)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
    },

    /// Publish a post
    Publish {
        /// Blog ID
        id: String,
    },

    /// Move a post back to draft
    Unpublish {
        /// Blog ID
        id: String,
    },

    /// Like a post, or remove your like
    Like {
        /// Blog ID
        id: String,
    },

    /// Comment on a post
    Comment {
        /// Blog ID
        id: String,

        /// Comment text
        text: String,
    },

    /// Delete a post you wrote
    Remove {
        /// Blog ID
        id: String,
    },
}

/// A post with its derived counters, as shown to the acting user
#[derive(Serialize)]
struct BlogView<'a> {
    #[serde(flatten)]
    blog: &'a Blog,
    likes_count: usize,
    comments_count: usize,
    liked: bool,
}

impl<'a> BlogView<'a> {
    fn new(blog: &'a Blog, session: &Session) -> Self {
        Self {
            blog,
            likes_count: blog.likes_count(),
            comments_count: blog.comments_count(),
            liked: session.actor().is_some_and(|a| blog.is_liked_by(&a.name)),
        }
    }
}

pub fn run(cmd: BlogCommands, session: &Session) -> Result<()> {
    match cmd {
        BlogCommands::Add {
            title,
            category,
            content,
            file,
            tags,
            publish,
            featured,
            cover_image,
        } => {
            let content = match (content, file) {
                (Some(content), _) => content,
                (None, Some(path)) => read_body(&path)?,
                (None, None) => anyhow::bail!("Provide --content or --file"),
            };
            let draft = NewBlog {
                title,
                category: category.parse()?,
                content,
                tags,
                publish,
                featured,
                cover_image,
            };
            add_blog(session, draft)
        }
        BlogCommands::Import { file } => import_blog(session, &file),
        BlogCommands::Export { id, output } => export_blog(session, &id, output.as_deref()),
        BlogCommands::List {
            category,
            drafts,
            sort,
            page,
            limit,
        } => {
            let category = category.as_deref().map(str::parse::<Category>).transpose()?;
            let sort = match sort.as_deref() {
                Some(label) => label.parse::<SortKey>().map_err(anyhow::Error::msg)?,
                None => SortKey::default(),
            };
            list_blogs(session, category, drafts, sort, page, limit)
        }
        BlogCommands::Show { id } => show_blog(session, &id),
        BlogCommands::Edit {
            id,
            title,
            category,
            content,
            file,
            tags,
        } => {
            let content = match (content, file) {
                (Some(content), _) => Some(content),
                (None, Some(path)) => Some(read_body(&path)?),
                (None, None) => None,
            };
            let changes = BlogChanges {
                title,
                category: category.as_deref().map(str::parse::<Category>).transpose()?,
                content,
                tags,
            };
            edit_blog(session, &id, changes)
        }
        BlogCommands::Publish { id } => set_status(session, &id, BlogStatus::Published),
        BlogCommands::Unpublish { id } => set_status(session, &id, BlogStatus::Draft),
        BlogCommands::Like { id } => like_blog(session, &id),
        BlogCommands::Comment { id, text } => comment_on_blog(session, &id, &text),
        BlogCommands::Remove { id } => remove_blog(session, &id),
    }
}

struct NewBlog {
    title: String,
    category: Category,
    content: String,
    tags: Vec<String>,
    publish: bool,
    featured: bool,
    cover_image: Option<String>,
}

struct BlogChanges {
    title: Option<String>,
    category: Option<Category>,
    content: Option<String>,
    tags: Vec<String>,
}

impl BlogChanges {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.content.is_none()
            && self.tags.is_empty()
    }
}

fn read_body(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn add_blog(session: &Session, draft: NewBlog) -> Result<()> {
    let actor = session.require_actor("create a blog")?;
    let project = Project::open_current()?;

    let mut blog = Blog::new(&draft.title, draft.category, draft.content, actor.name.as_str())?;
    blog.set_tags(&draft.tags);
    if draft.publish {
        blog.set_status(BlogStatus::Published);
    }
    blog.featured = draft.featured;
    blog.cover_image = draft.cover_image;

    project.blog_store().append(&blog)?;
    debug!(id = %blog.id, author = %blog.author, "created blog");

    report_saved(session, &blog, "Created")
}

fn import_blog(session: &Session, file: &Path) -> Result<()> {
    let actor = session.require_actor("import a blog")?;
    let project = Project::open_current()?;

    let blog = read_markdown_file(file)?.into_blog(Some(&actor.name))?;
    blog.ensure_can_modify(Some(actor), "import")?;

    project.blog_store().append(&blog)?;
    debug!(id = %blog.id, file = %file.display(), "imported blog");

    report_saved(session, &blog, "Imported")
}

fn export_blog(session: &Session, id_str: &str, output: Option<&Path>) -> Result<()> {
    let project = Project::open_current()?;
    let id: BlogId = id_str.parse()?;
    let blog = project.blog_store().require(&id)?;

    match output {
        Some(path) => {
            write_markdown_file(&blog, path)?;
            if session.output.is_json() {
                session.output.data(&serde_json::json!({
                    "id": blog.id,
                    "path": path.display().to_string(),
                }));
            } else {
                session
                    .output
                    .success(&format!("Exported {} to {}", blog.id, path.display()));
            }
        }
        None => {
            let markdown = render_markdown(&blog)?;
            if session.output.is_json() {
                session.output.data(&serde_json::json!({
                    "id": blog.id,
                    "markdown": markdown,
                }));
            } else {
                print!("{}", markdown);
            }
        }
    }

    Ok(())
}

fn list_blogs(
    session: &Session,
    category: Option<Category>,
    include_drafts: bool,
    sort: SortKey,
    page: usize,
    limit: Option<usize>,
) -> Result<()> {
    let project = Project::open_current()?;
    let blogs = project.blog_store().read_ordered()?;

    let query = ListQuery {
        category,
        include_drafts,
        sort,
        page,
        limit: limit.unwrap_or(project.config().project.page_size),
    };
    let page = list(&blogs, &query);

    if session.output.is_json() {
        session.output.data(&page);
    } else if page.data.is_empty() {
        println!("No blogs found");
    } else {
        println!(
            "{:<10} {:<10} {:<12} {:>6} {:>5} TITLE",
            "ID", "STATUS", "CATEGORY", "VIEWS", "MIN"
        );
        println!("{}", "-".repeat(80));
        for blog in &page.data {
            println!(
                "{:<10} {:<10} {:<12} {:>6} {:>5} {}",
                blog.id,
                blog.status,
                blog.category,
                blog.views,
                blog.read_time,
                truncate(&blog.title, 40)
            );
        }
        println!();
        println!(
            "Page {} of {} ({} total)",
            page.current_page,
            page.total_pages.max(1),
            page.total
        );
    }

    Ok(())
}

fn show_blog(session: &Session, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.blog_store();
    let id: BlogId = id_str.parse()?;

    let mut blog = store.require(&id)?;
    blog.record_view();
    store.update(&blog)?;

    if session.output.is_json() {
        session.output.data(&BlogView::new(&blog, session));
        return Ok(());
    }

    println!("{}  {}", blog.id, blog.title);
    println!("{}", "=".repeat(60));
    println!("Category:  {}", blog.category);
    println!("Status:    {}", blog.status);
    println!("Author:    {}", blog.author);
    if !blog.tags.is_empty() {
        println!("Tags:      {}", blog.tags.join(", "));
    }
    println!(
        "Read time: {} min  Views: {}  Likes: {}  Comments: {}",
        blog.read_time,
        blog.views,
        blog.likes_count(),
        blog.comments_count()
    );
    println!("Created:   {}", blog.created_at.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", blog.content.trim_end());

    if !blog.comments.is_empty() {
        println!();
        println!("Comments ({}):", blog.comments_count());
        for comment in &blog.comments {
            println!(
                "  {} ({}): {}",
                comment.user,
                comment.created_at.format("%Y-%m-%d"),
                comment.text
            );
        }
    }

    Ok(())
}

fn edit_blog(session: &Session, id_str: &str, changes: BlogChanges) -> Result<()> {
    if changes.is_empty() {
        anyhow::bail!("Nothing to change; pass --title, --category, --content, --file or --tag");
    }

    let project = Project::open_current()?;
    let store = project.blog_store();
    let id: BlogId = id_str.parse()?;

    let mut blog = store.require(&id)?;
    blog.ensure_can_modify(session.actor(), "edit")?;

    if let Some(title) = &changes.title {
        blog.set_title(title)?;
    }
    if let Some(category) = changes.category {
        blog.set_category(category);
    }
    if let Some(content) = changes.content {
        blog.set_content(content)?;
    }
    if !changes.tags.is_empty() {
        blog.set_tags(&changes.tags);
    }

    store.update(&blog)?;
    debug!(id = %blog.id, "edited blog");

    report_saved(session, &blog, "Updated")
}

fn set_status(session: &Session, id_str: &str, status: BlogStatus) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.blog_store();
    let id: BlogId = id_str.parse()?;

    let mut blog = store.require(&id)?;
    let action = match status {
        BlogStatus::Published => "publish",
        BlogStatus::Draft => "unpublish",
    };
    blog.ensure_can_modify(session.actor(), action)?;

    blog.set_status(status);
    store.update(&blog)?;

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "id": blog.id,
            "status": blog.status,
        }));
    } else {
        session
            .output
            .success(&format!("{}: {} - {}", blog.status, blog.id, blog.title));
    }

    Ok(())
}

fn like_blog(session: &Session, id_str: &str) -> Result<()> {
    let actor = session.require_actor("like a blog")?;
    let project = Project::open_current()?;
    let store = project.blog_store();
    let id: BlogId = id_str.parse()?;

    let mut blog = store.require(&id)?;
    let liked = blog.toggle_like(&actor.name);
    store.update(&blog)?;

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "id": blog.id,
            "liked": liked,
            "likes_count": blog.likes_count(),
        }));
    } else if liked {
        session.output.success(&format!(
            "Liked {} ({} likes)",
            blog.id,
            blog.likes_count()
        ));
    } else {
        session.output.success(&format!(
            "Unliked {} ({} likes)",
            blog.id,
            blog.likes_count()
        ));
    }

    Ok(())
}

fn comment_on_blog(session: &Session, id_str: &str, text: &str) -> Result<()> {
    let actor = session.require_actor("comment on a blog")?;
    let project = Project::open_current()?;
    let store = project.blog_store();
    let id: BlogId = id_str.parse()?;

    let mut blog = store.require(&id)?;
    let comment = blog.add_comment(&actor.name, text)?.clone();
    store.update(&blog)?;

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "id": blog.id,
            "comment": comment,
            "comments_count": blog.comments_count(),
        }));
    } else {
        session
            .output
            .success(&format!("Commented on {} - {}", blog.id, blog.title));
    }

    Ok(())
}

fn remove_blog(session: &Session, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.blog_store();
    let id: BlogId = id_str.parse()?;

    let blog = store.require(&id)?;
    blog.ensure_can_modify(session.actor(), "remove")?;
    store.remove(&id)?;
    debug!(id = %id, "removed blog");

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "id": id,
            "removed": true,
        }));
    } else {
        session
            .output
            .success(&format!("Removed blog: {} - {}", blog.id, blog.title));
    }

    Ok(())
}

fn report_saved(session: &Session, blog: &Blog, verb: &str) -> Result<()> {
    if session.output.is_json() {
        session.output.data(&BlogView::new(blog, session));
    } else {
        session.output.success(&format!(
            "{} blog: {} - {} ({}, {})",
            verb, blog.id, blog.title, blog.category, blog.status
        ));
    }
    Ok(())
}
