//! Markdown interchange for blogs
//!
//! Posts can be written as markdown files with YAML frontmatter and
//! imported into the store, or exported back out the same way:
//!
//! ```text
//! ---
//! title: Intro to Rust
//! category: Programming
//! tags: [rust, beginners]
//! status: published
//! ---
//!
//! Body text...
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Blog, BlogStatus, Category};

/// Frontmatter section of a blog markdown file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogFrontmatter {
    pub title: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: BlogStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl From<&Blog> for BlogFrontmatter {
    fn from(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            category: blog.category,
            tags: blog.tags.clone(),
            status: blog.status,
            author: Some(blog.author.clone()),
            featured: blog.featured,
            cover_image: blog.cover_image.clone(),
        }
    }
}

/// A parsed markdown post, not yet in the store
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownPost {
    pub frontmatter: BlogFrontmatter,
    pub body: String,
}

impl MarkdownPost {
    /// Builds a new blog; `default_author` is used when the frontmatter has none
    pub fn into_blog(self, default_author: Option<&str>) -> Result<Blog> {
        let fm = self.frontmatter;
        let author = fm
            .author
            .or_else(|| default_author.map(String::from))
            .ok_or_else(|| anyhow::anyhow!("No author in frontmatter and no acting user"))?;

        let mut blog = Blog::new(&fm.title, fm.category, self.body, author)?;
        blog.set_tags(fm.tags);
        blog.set_status(fm.status);
        blog.featured = fm.featured;
        blog.cover_image = fm.cover_image;

        Ok(blog)
    }
}

/// Parses a markdown string with frontmatter
pub fn parse_markdown(content: &str) -> Result<MarkdownPost> {
    // Manual frontmatter parsing
    let content = content.trim();

    let rest = content
        .strip_prefix("---")
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter (must start with ---)"))?;

    // Find the end of frontmatter
    let end_pos = rest
        .find("\n---")
        .ok_or_else(|| anyhow::anyhow!("Missing frontmatter end delimiter (---)"))?;

    let yaml_content = rest[..end_pos].trim();
    let body = rest[end_pos + 4..].trim();

    let frontmatter: BlogFrontmatter =
        serde_yaml::from_str(yaml_content).context("Failed to parse frontmatter")?;

    Ok(MarkdownPost {
        frontmatter,
        body: body.to_string(),
    })
}

/// Renders a blog to markdown
pub fn render_markdown(blog: &Blog) -> Result<String> {
    let frontmatter = BlogFrontmatter::from(blog);
    let yaml = serde_yaml::to_string(&frontmatter).context("Failed to serialize frontmatter")?;

    let mut content = String::new();
    content.push_str("---\n");
    content.push_str(&yaml);
    content.push_str("---\n\n");
    content.push_str(&blog.content);

    if !content.ends_with('\n') {
        content.push('\n');
    }

    Ok(content)
}

/// Reads and parses a markdown file
pub fn read_markdown_file(path: &Path) -> Result<MarkdownPost> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read markdown file: {}", path.display()))?;

    parse_markdown(&content).with_context(|| format!("Invalid blog file: {}", path.display()))
}

/// Writes a blog to a markdown file atomically (temp file + rename)
pub fn write_markdown_file(blog: &Blog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension("md.tmp");
    let content = render_markdown(blog)?;

    // Write to temp file first
    fs::write(&temp_path, &content)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    // Atomic rename
    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"---
title: Intro to Rust
category: Programming
tags: [rust, beginners]
status: published
---

Rust is a programming language.

It has --- dashes in the body too.
"#;

    #[test]
    fn parse_frontmatter_and_body() {
        let post = parse_markdown(SAMPLE).unwrap();

        assert_eq!(post.frontmatter.title, "Intro to Rust");
        assert_eq!(post.frontmatter.category, Category::Programming);
        assert_eq!(post.frontmatter.tags, vec!["rust", "beginners"]);
        assert_eq!(post.frontmatter.status, BlogStatus::Published);
        assert!(post.frontmatter.author.is_none());
        assert!(post.body.starts_with("Rust is a programming language."));
        assert!(post.body.contains("--- dashes"));
    }

    #[test]
    fn missing_frontmatter_is_an_error() {
        assert!(parse_markdown("Just a body").is_err());
        assert!(parse_markdown("---\ntitle: x\n").is_err());
    }

    #[test]
    fn unknown_category_is_an_error() {
        let text = "---\ntitle: Soup\ncategory: Cooking\n---\nbody";
        assert!(parse_markdown(text).is_err());
    }

    #[test]
    fn into_blog_uses_default_author() {
        let blog = parse_markdown(SAMPLE)
            .unwrap()
            .into_blog(Some("ada"))
            .unwrap();

        assert_eq!(blog.author, "ada");
        assert_eq!(blog.slug, "intro-to-rust");
        assert!(blog.is_published());

        assert!(parse_markdown(SAMPLE).unwrap().into_blog(None).is_err());
    }

    #[test]
    fn render_then_parse_preserves_fields() {
        let mut blog = Blog::new("Career Tips", Category::Career, "Be kind.", "ada").unwrap();
        blog.set_tags(["jobs"]);
        blog.featured = true;

        let post = parse_markdown(&render_markdown(&blog).unwrap()).unwrap();

        assert_eq!(post.frontmatter, BlogFrontmatter::from(&blog));
        assert_eq!(post.body, "Be kind.");
    }

    #[test]
    fn write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("post.md");
        let blog = Blog::new("On Disk", Category::Other, "Body", "ada").unwrap();

        write_markdown_file(&blog, &path).unwrap();
        assert!(!path.with_extension("md.tmp").exists());

        let post = read_markdown_file(&path).unwrap();
        assert_eq!(post.frontmatter.title, "On Disk");
    }
}
