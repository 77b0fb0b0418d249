//! Blog and course identifiers
//!
//! ID Formats:
//! - Blog: `b-{7-char-hash}` (e.g., `b-7f2b4c1`)
//! - Course: `c-{7-char-hash}` (e.g., `c-0a91e3d`)
//!
//! Hash is derived from title + creation timestamp, so two items with the
//! same title created at different times get different IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid blog ID format: expected 'b-{{7-char-hash}}', got '{0}'")]
    InvalidBlogId(String),

    #[error("Invalid course ID format: expected 'c-{{7-char-hash}}', got '{0}'")]
    InvalidCourseId(String),
}

/// Generates a 7-character hash from title and timestamp
fn generate_hash(title: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", title, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Extracts the lowercased hash from `{prefix}-{7 hex}`
fn parse_hash(s: &str, prefix: &str) -> Option<String> {
    let hash = s.strip_prefix(prefix)?.strip_prefix('-')?;

    if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(hash.to_ascii_lowercase())
}

/// Blog ID in the format `b-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlogId {
    hash: String,
}

impl BlogId {
    /// Creates a new blog ID from title and timestamp
    pub fn new(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(title, timestamp),
        }
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("b-{}", self.hash))
    }
}

impl FromStr for BlogId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = parse_hash(s, "b").ok_or_else(|| IdError::InvalidBlogId(s.to_string()))?;
        Ok(Self { hash })
    }
}

impl TryFrom<String> for BlogId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BlogId> for String {
    fn from(id: BlogId) -> Self {
        id.to_string()
    }
}

/// Course ID in the format `c-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId {
    hash: String,
}

impl CourseId {
    pub fn new(title: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(title, timestamp),
        }
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("c-{}", self.hash))
    }
}

impl FromStr for CourseId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = parse_hash(s, "c").ok_or_else(|| IdError::InvalidCourseId(s.to_string()))?;
        Ok(Self { hash })
    }
}

impl TryFrom<String> for CourseId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.to_string()
    }
}
