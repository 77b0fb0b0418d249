//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{BlogStore, Cache, Config, CourseStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a learnpath project. Run 'learnpath init' first.")]
    NotInProject,
}

/// Default project config written by `init`
const DEFAULT_CONFIG: &str = r#"# learnpath configuration

# Only consider published posts when generating learning paths
published_only = false

# Defaults for 'learnpath path'
default_level = "beginner"
default_budget = "medium"

# Posts per page in 'learnpath blog list'
page_size = 10

# Posts shown by 'learnpath popular'
popular_limit = 5

# Acting user (author of new posts). Falls back to $LEARNPATH_USER, then $USER.
# [user]
# name = "ada"
# role = "user"
"#;

/// A learnpath project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".learnpath").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".learnpath");

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create .learnpath directory: {}", data_dir.display())
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = data_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Ignore SQLite cache (regenerated from blogs.jsonl)
.cache/
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .learnpath directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".learnpath")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the blog store
    pub fn blog_store(&self) -> BlogStore {
        BlogStore::for_project(&self.root)
    }

    /// Returns the course store
    pub fn course_store(&self) -> CourseStore {
        CourseStore::for_project(&self.root)
    }

    /// Opens the SQLite cache for this project
    pub fn cache(&self) -> Result<Cache> {
        Cache::open(&self.root)
    }

    /// Rebuilds the cache from the blog store
    pub fn rebuild_cache(&self) -> Result<()> {
        let mut cache = self.cache()?;
        let blogs = self.blog_store().read_all()?;
        cache.rebuild(&blogs)?;
        Ok(())
    }

    /// Gets the cache if it's fresh, or rebuilds it if stale
    pub fn get_or_rebuild_cache(&self) -> Result<Cache> {
        let mut cache = self.cache()?;

        if cache.is_stale()? {
            let blogs = self.blog_store().read_all()?;
            cache.rebuild(&blogs)?;
        }

        Ok(cache)
    }
}
