//! # Storage Layer
//!
//! Persistence layer for learnpath with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Blogs | JSONL (one JSON per line) | `.learnpath/blogs.jsonl` |
//! | Courses | JSONL | `.learnpath/courses.jsonl` |
//! | Config | TOML | `.learnpath/config.toml` |
//! | Cache | SQLite + FTS5 (auto-regenerated) | `.learnpath/.cache/learnpath.db` |
//! | Import/export | Markdown + YAML frontmatter | anywhere |
//!
//! ## Concurrency Safety
//!
//! - [`BlogStore`] and [`CourseStore`] use file locking (`fs2`) for concurrent access
//! - [`Cache`] is invalidated when the mtime or size of `blogs.jsonl` changes
//! - All writes are atomic (temp file + rename)
//!
//! ## Project Structure
//!
//! ```text
//! .learnpath/
//! ├── blogs.jsonl           # All posts in JSONL format
//! ├── courses.jsonl         # Courses and enrollments
//! ├── config.toml           # Project configuration
//! ├── .cache/               # SQLite search cache
//! └── .gitignore            # Ignores the cache
//! ```

mod jsonl;
mod markdown;
mod config;
mod project;
mod cache;

pub use jsonl::{BlogStore, CourseStore, JsonlStore, Record};
pub use markdown::{
    parse_markdown, read_markdown_file, render_markdown, write_markdown_file, BlogFrontmatter,
    MarkdownPost,
};
pub use config::{Config, ConfigError, GlobalConfig, ProjectConfig, UserConfig};
pub use project::{Project, ProjectError};
pub use cache::{Cache, CacheError, SearchResult, StatusCounts};
