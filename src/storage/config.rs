//! Configuration handling for learnpath
//!
//! Configuration is stored in `.learnpath/config.toml` (project) and
//! `~/.config/learnpath/config.toml` (global). `LEARNPATH_CONFIG_DIR`
//! overrides the global directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::domain::{Actor, Level, Role, TimeBudget};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Identity settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct UserConfig {
    /// Name used as author and for likes/comments
    pub name: Option<String>,

    /// Role of the configured user
    pub role: Role,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Only published posts are considered for learning paths
    pub published_only: bool,

    /// Level used by `learnpath path` when none is given
    pub default_level: Level,

    /// Budget used by `learnpath path` when none is given
    pub default_budget: TimeBudget,

    /// Posts per page in `blog list`
    pub page_size: usize,

    /// Posts shown by `popular`
    pub popular_limit: usize,

    pub user: UserConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            published_only: false,
            default_level: Level::Beginner,
            default_budget: TimeBudget::Medium,
            page_size: 10,
            popular_limit: 5,
            user: UserConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Checks values that parse but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if self.popular_limit == 0 {
            return Err(ConfigError::Invalid(
                "popular_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    pub user: UserConfig,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("LEARNPATH_CONFIG_DIR") {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("dev", "learnpath", "learnpath-cli")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".learnpath").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .validate()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;

        Ok(config)
    }

    /// Finds the project root by looking for a `.learnpath/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".learnpath").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolves the acting user
    ///
    /// An explicit `name_override` wins, then the project `[user]`, then the
    /// global `[user]`, then `$LEARNPATH_USER` and `$USER`. The configured role
    /// only applies to the configured name, and never to an override.
    pub fn resolve_actor(&self, name_override: Option<&str>) -> Option<Actor> {
        let configured = [&self.project.user, &self.global.user]
            .into_iter()
            .find(|u| u.name.is_some());

        if let Some(name) = name_override {
            return (!name.trim().is_empty()).then(|| Actor::new(name, Role::User));
        }

        let name = configured
            .and_then(|u| u.name.clone())
            .or_else(|| std::env::var("LEARNPATH_USER").ok())
            .or_else(|| std::env::var("USER").ok())
            .filter(|n| !n.trim().is_empty())?;

        let role = configured
            .filter(|u| u.name.as_deref() == Some(name.as_str()))
            .map(|u| u.role)
            .unwrap_or_default();

        Some(Actor::new(name, role))
    }
}
