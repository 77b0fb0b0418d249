//! SQLite cache for fast queries
//!
//! The cache sits in `.learnpath/.cache/learnpath.db` and mirrors the
//! source-of-truth `blogs.jsonl`. Cache invalidation is based on the
//! store's modification time and size.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Blog, BlogId};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid search query '{query}': {source}")]
    Query {
        query: String,
        #[source]
        source: rusqlite::Error,
    },
}

/// SQLite cache for fast queries
pub struct Cache {
    /// Path to the SQLite database
    db_path: PathBuf,

    /// Path to blogs.jsonl (for mtime comparison)
    blogs_path: PathBuf,

    conn: Connection,
}

impl Cache {
    /// Schema version - bump when schema changes to force rebuild
    const SCHEMA_VERSION: i32 = 1;

    /// Maximum number of search hits returned
    const SEARCH_LIMIT: usize = 50;

    /// Creates or opens the cache for a project
    pub fn open(project_root: &Path) -> Result<Self> {
        let data_dir = project_root.join(".learnpath");
        let cache_dir = data_dir.join(".cache");
        let db_path = cache_dir.join("learnpath.db");
        let blogs_path = data_dir.join("blogs.jsonl");

        fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open cache database: {}", db_path.display()))?;

        // WAL lets readers proceed during a rebuild
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let mut cache = Self {
            db_path,
            blogs_path,
            conn,
        };

        cache.ensure_schema()?;

        Ok(cache)
    }

    fn ensure_schema(&mut self) -> Result<()> {
        if self.get_schema_version()? != Self::SCHEMA_VERSION {
            self.create_schema()?;
        }
        Ok(())
    }

    fn get_schema_version(&self) -> Result<i32> {
        let version: Option<i32> = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .optional()?;

        Ok(version.unwrap_or(0))
    }

    /// Creates the schema from scratch
    fn create_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            DROP TABLE IF EXISTS blogs_fts;
            DROP TABLE IF EXISTS blogs;
            DROP TABLE IF EXISTS cache_meta;

            CREATE TABLE blogs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                category TEXT NOT NULL,
                tags TEXT NOT NULL,
                status TEXT NOT NULL,
                author TEXT NOT NULL,
                views INTEGER NOT NULL,
                likes INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                content TEXT NOT NULL
            );

            CREATE TABLE cache_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX idx_blogs_status ON blogs(status);
            CREATE INDEX idx_blogs_category ON blogs(category);

            CREATE VIRTUAL TABLE blogs_fts USING fts5(
                id,
                title,
                content,
                tags,
                content='blogs',
                content_rowid='rowid'
            );

            CREATE TRIGGER blogs_ai AFTER INSERT ON blogs BEGIN
                INSERT INTO blogs_fts(rowid, id, title, content, tags)
                VALUES (NEW.rowid, NEW.id, NEW.title, NEW.content, NEW.tags);
            END;

            CREATE TRIGGER blogs_ad AFTER DELETE ON blogs BEGIN
                INSERT INTO blogs_fts(blogs_fts, rowid, id, title, content, tags)
                VALUES ('delete', OLD.rowid, OLD.id, OLD.title, OLD.content, OLD.tags);
            END;

            CREATE TRIGGER blogs_au AFTER UPDATE ON blogs BEGIN
                INSERT INTO blogs_fts(blogs_fts, rowid, id, title, content, tags)
                VALUES ('delete', OLD.rowid, OLD.id, OLD.title, OLD.content, OLD.tags);
                INSERT INTO blogs_fts(rowid, id, title, content, tags)
                VALUES (NEW.rowid, NEW.id, NEW.title, NEW.content, NEW.tags);
            END;
            ",
        )?;

        self.conn.execute(
            &format!("PRAGMA user_version = {}", Self::SCHEMA_VERSION),
            [],
        )?;

        Ok(())
    }

    /// Checks if the cache needs to be rebuilt
    ///
    /// The cache is fresh while `blogs.jsonl` has the modification time and
    /// size it had at the last rebuild.
    pub fn is_stale(&self) -> Result<bool> {
        let recorded = self.meta("source_stamp")?;
        Ok(recorded.as_deref() != Some(self.source_stamp()?.as_str()))
    }

    /// Time of the last rebuild, if there has been one
    pub fn last_rebuild(&self) -> Result<Option<SystemTime>> {
        Ok(self
            .meta("last_rebuild")?
            .and_then(|s| s.parse::<u64>().ok())
            .map(|nanos| SystemTime::UNIX_EPOCH + Duration::from_nanos(nanos)))
    }

    fn meta(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM cache_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Modification time and size of blogs.jsonl, or "missing"
    fn source_stamp(&self) -> Result<String> {
        if !self.blogs_path.exists() {
            return Ok("missing".to_string());
        }

        let meta = fs::metadata(&self.blogs_path)
            .with_context(|| format!("Failed to stat {}", self.blogs_path.display()))?;
        let mtime = meta
            .modified()?
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();

        Ok(format!("{}:{}", mtime, meta.len()))
    }

    fn record_rebuild(&self) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_nanos();

        self.conn.execute(
            "INSERT OR REPLACE INTO cache_meta (key, value) VALUES ('last_rebuild', ?1)",
            params![now.to_string()],
        )?;
        self.conn.execute(
            "INSERT OR REPLACE INTO cache_meta (key, value) VALUES ('source_stamp', ?1)",
            params![self.source_stamp()?],
        )?;

        Ok(())
    }

    /// Rebuilds the cache from the given blogs
    pub fn rebuild(&mut self, blogs: &HashMap<BlogId, Blog>) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM blogs", [])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO blogs (id, title, category, tags, status, author, views, likes, created_at, content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;

            for blog in blogs.values() {
                stmt.execute(params![
                    blog.id.to_string(),
                    blog.title,
                    blog.category.as_str(),
                    blog.tags.join(" "),
                    blog.status.to_string(),
                    blog.author,
                    blog.views as i64,
                    blog.likes_count() as i64,
                    blog.created_at.to_rfc3339(),
                    blog.content,
                ])?;
            }
        }

        tx.commit()?;

        self.record_rebuild()?;

        debug!(count = blogs.len(), path = %self.db_path.display(), "rebuilt cache");

        Ok(())
    }

    /// Full-text search over published posts, best match first
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.id, b.title, b.category, snippet(blogs_fts, 2, '<mark>', '</mark>', '...', 32)
             FROM blogs_fts
             JOIN blogs b ON b.rowid = blogs_fts.rowid
             WHERE blogs_fts MATCH ?1 AND b.status = 'published'
             ORDER BY rank LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![query, Self::SEARCH_LIMIT as i64], |row| {
                Ok(SearchResult {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    category: row.get(2)?,
                    snippet: row.get(3)?,
                })
            })
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|source| CacheError::Query {
                query: query.to_string(),
                source,
            })?;

        Ok(rows)
    }

    /// Query: post counts by status
    pub fn status_counts(&self) -> Result<StatusCounts> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM blogs GROUP BY status")?;

        let mut counts = StatusCounts::default();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        for row in rows {
            let (status, count) = row?;
            match status.as_str() {
                "published" => counts.published = count as usize,
                _ => counts.draft += count as usize,
            }
        }

        Ok(counts)
    }

    /// Query: published post counts by category
    pub fn category_counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM blogs WHERE status = 'published' GROUP BY category",
        )?;

        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(counts)
    }

    /// Query: total views across all posts
    pub fn total_views(&self) -> Result<u64> {
        let total: i64 =
            self.conn
                .query_row("SELECT COALESCE(SUM(views), 0) FROM blogs", [], |row| {
                    row.get(0)
                })?;
        Ok(total as u64)
    }

    /// Returns the path to the cache database
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

/// Result from a search query
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub category: String,
    pub snippet: String,
}

/// Post counts by publication status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub draft: usize,
    pub published: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.draft + self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlogStatus, Category};
    use tempfile::TempDir;

    fn setup_project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let project_root = dir.path().to_path_buf();

        fs::create_dir_all(project_root.join(".learnpath")).unwrap();

        (dir, project_root)
    }

    fn make_blog(title: &str, category: Category, content: &str, published: bool) -> Blog {
        let mut blog = Blog::new(title, category, content, "ada").unwrap();
        if published {
            blog.set_status(BlogStatus::Published);
        }
        blog
    }

    fn index(blogs: Vec<Blog>) -> HashMap<BlogId, Blog> {
        blogs.into_iter().map(|b| (b.id.clone(), b)).collect()
    }

    #[test]
    fn test_cache_creation() {
        let (_dir, project_root) = setup_project();
        let cache = Cache::open(&project_root).unwrap();

        assert!(cache.path().exists());
        assert!(cache.is_stale().unwrap());
    }

    #[test]
    fn test_cache_rebuild_counts() {
        let (_dir, project_root) = setup_project();
        let mut cache = Cache::open(&project_root).unwrap();

        let blogs = index(vec![
            make_blog("One", Category::Programming, "first", true),
            make_blog("Two", Category::Programming, "second", true),
            make_blog("Three", Category::Career, "third", false),
        ]);
        cache.rebuild(&blogs).unwrap();

        let counts = cache.status_counts().unwrap();
        assert_eq!(counts, StatusCounts { draft: 1, published: 2 });
        assert_eq!(counts.total(), 3);

        let by_category = cache.category_counts().unwrap();
        assert_eq!(by_category.get("Programming"), Some(&2));
        assert_eq!(by_category.get("Career"), None);

        assert!(!cache.is_stale().unwrap());
    }

    #[test]
    fn test_search_only_published() {
        let (_dir, project_root) = setup_project();
        let mut cache = Cache::open(&project_root).unwrap();

        let blogs = index(vec![
            make_blog("Ownership in Rust", Category::Programming, "The borrow checker explained", true),
            make_blog("Borrowing draft", Category::Programming, "More on the borrow checker", false),
            make_blog("Resume tips", Category::Career, "Write less", true),
        ]);
        cache.rebuild(&blogs).unwrap();

        let results = cache.search("borrow").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Ownership in Rust");
        assert!(results[0].snippet.contains("<mark>"));

        assert!(cache.search("nothing-like-this").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_query_is_an_error() {
        let (_dir, project_root) = setup_project();
        let cache = Cache::open(&project_root).unwrap();

        assert!(cache.search("\"unbalanced").is_err());
    }

    #[test]
    fn test_store_write_makes_cache_stale() {
        let (_dir, project_root) = setup_project();
        let mut cache = Cache::open(&project_root).unwrap();
        cache.rebuild(&HashMap::new()).unwrap();
        assert!(!cache.is_stale().unwrap());

        fs::write(project_root.join(".learnpath").join("blogs.jsonl"), "").unwrap();

        assert!(cache.is_stale().unwrap());
    }

    #[test]
    fn test_schema_version() {
        let (_dir, project_root) = setup_project();
        let cache = Cache::open(&project_root).unwrap();

        let version = cache.get_schema_version().unwrap();
        assert_eq!(version, Cache::SCHEMA_VERSION);
    }
}
