//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `status` |
//! | Blog | Post lifecycle | `blog add`, `blog list`, `blog show`, `blog like` |
//! | Course | Courses and enrollment | `course add`, `course enroll`, `course mine` |
//! | Query | Catalog queries | `popular`, `search` |
//! | Path | Learning paths | `path Programming --level beginner --budget short` |
//! | Cache | SQLite cache upkeep | `cache rebuild`, `cache status` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Identity
//!
//! Writes are made on behalf of an acting user resolved from `--as`, the
//! `[user]` config table, `$LEARNPATH_USER` or `$USER`, in that order.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logs on stderr:
//! ```bash
//! learnpath --verbose path Programming
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod session;
mod blog;
mod course;
mod path;
mod query;
mod cache_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
pub use session::Session;
