//! Blog domain model
//!
//! Blogs are the content items of the catalog. Each post belongs to one
//! category and carries free-form tags; together these are the topics a
//! learning path is matched against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::BlogId;
use super::path::{self, ContentItem};
use super::user::Actor;

/// Maximum title length, in characters
pub const MAX_TITLE_LEN: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum BlogError {
    #[error("A blog must have a title")]
    EmptyTitle,

    #[error("Title cannot be more than {MAX_TITLE_LEN} characters")]
    TitleTooLong,

    #[error("A blog must have content")]
    EmptyContent,

    #[error("Comment text cannot be empty")]
    EmptyComment,

    #[error("Unknown category: {0} (expected Technology, Education, Programming, Career or Other)")]
    UnknownCategory(String),

    #[error("Unknown blog status: {0} (expected draft or published)")]
    UnknownStatus(String),

    #[error("Not authorized to {action} blog {id}")]
    Forbidden { action: String, id: BlogId },

    #[error("An identity is required to {0}; set [user] name in config or pass --as")]
    Anonymous(String),
}

/// Category of a blog post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Education,
    Programming,
    Career,
    Other,
}

impl Category {
    /// Returns all categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Category::Technology,
            Category::Education,
            Category::Programming,
            Category::Career,
            Category::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Education => "Education",
            Category::Programming => "Programming",
            Category::Career => "Career",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BlogError::UnknownCategory(s.to_string()))
    }
}

/// Publication status of a blog post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
}

impl BlogStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, BlogStatus::Published)
    }
}

impl std::fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlogStatus::Draft => f.pad("draft"),
            BlogStatus::Published => f.pad("published"),
        }
    }
}

impl std::str::FromStr for BlogStatus {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(BlogStatus::Draft),
            "published" | "publish" => Ok(BlogStatus::Published),
            _ => Err(BlogError::UnknownStatus(s.to_string())),
        }
    }
}

/// A reader comment on a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    /// Unique identifier
    pub id: BlogId,

    /// Human-readable title
    pub title: String,

    /// URL-friendly form of the title
    pub slug: String,

    pub category: Category,

    /// Post body (markdown)
    pub content: String,

    /// Name of the author
    pub author: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub status: BlogStatus,

    /// Estimated reading time in minutes
    #[serde(default)]
    pub read_time: u32,

    #[serde(default)]
    pub views: u64,

    /// Names of users who liked the post
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub likes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Creates a new draft post
    pub fn new(
        title: &str,
        category: Category,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Self, BlogError> {
        let title = validate_title(title)?;
        let content = validate_content(content.into())?;
        let now = Utc::now();

        Ok(Self {
            id: BlogId::new(&title, now),
            slug: slugify(&title),
            read_time: read_time_minutes(&content),
            title,
            category,
            content,
            author: author.into(),
            tags: Vec::new(),
            status: BlogStatus::Draft,
            views: 0,
            likes: Vec::new(),
            comments: Vec::new(),
            featured: false,
            cover_image: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the title (and slug)
    pub fn set_title(&mut self, title: &str) -> Result<(), BlogError> {
        self.title = validate_title(title)?;
        self.slug = slugify(&self.title);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the body and recomputes the reading time
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), BlogError> {
        self.content = validate_content(content.into())?;
        self.read_time = read_time_minutes(&self.content);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) {
        if self.category != category {
            self.category = category;
            self.updated_at = Utc::now();
        }
    }

    /// Replaces the tags, trimming them and dropping blanks and duplicates
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !cleaned.iter().any(|t| t == tag) {
                cleaned.push(tag.to_string());
            }
        }
        self.tags = cleaned;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: BlogStatus) {
        if self.status != status {
            self.status = status;
            self.updated_at = Utc::now();
        }
    }

    pub fn is_published(&self) -> bool {
        self.status.is_published()
    }

    /// Counts one read of the post
    pub fn record_view(&mut self) {
        self.views += 1;
    }

    /// Likes or unlikes the post for `user`; returns true if it is now liked
    pub fn toggle_like(&mut self, user: &str) -> bool {
        let liked = if let Some(pos) = self.likes.iter().position(|u| u == user) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(user.to_string());
            true
        };
        self.updated_at = Utc::now();
        liked
    }

    pub fn is_liked_by(&self, user: &str) -> bool {
        self.likes.iter().any(|u| u == user)
    }

    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn add_comment(&mut self, user: &str, text: &str) -> Result<&Comment, BlogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BlogError::EmptyComment);
        }

        let now = Utc::now();
        self.comments.push(Comment {
            user: user.to_string(),
            text: text.to_string(),
            created_at: now,
        });
        self.updated_at = now;

        Ok(&self.comments[self.comments.len() - 1])
    }

    pub fn comments_count(&self) -> usize {
        self.comments.len()
    }

    /// Returns true if `actor` may edit or delete this post
    ///
    /// Only the author or an admin may; anonymous callers never may.
    pub fn can_modify(&self, actor: Option<&Actor>) -> bool {
        actor.is_some_and(|a| a.is_admin() || a.name == self.author)
    }

    /// Like [`can_modify`](Self::can_modify), as an error for the given action
    pub fn ensure_can_modify(&self, actor: Option<&Actor>, action: &str) -> Result<(), BlogError> {
        match actor {
            None => Err(BlogError::Anonymous(format!("{} a blog", action))),
            Some(_) if self.can_modify(actor) => Ok(()),
            Some(_) => Err(BlogError::Forbidden {
                action: action.to_string(),
                id: self.id.clone(),
            }),
        }
    }
}

impl ContentItem for Blog {
    fn item_id(&self) -> String {
        self.id.to_string()
    }

    fn topics(&self) -> Vec<&str> {
        std::iter::once(self.category.as_str())
            .chain(self.tags.iter().map(String::as_str))
            .collect()
    }

    fn body(&self) -> &str {
        &self.content
    }
}

fn validate_title(title: &str) -> Result<String, BlogError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(BlogError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(BlogError::TitleTooLong);
    }
    Ok(title.to_string())
}

fn validate_content(content: String) -> Result<String, BlogError> {
    if content.trim().is_empty() {
        return Err(BlogError::EmptyContent);
    }
    Ok(content)
}

/// Reading time in whole minutes at 200 words per minute, rounded up
pub fn read_time_minutes(content: &str) -> u32 {
    let words = path::word_count(content) as u32;
    words.div_ceil(path::WORDS_PER_MINUTE as u32)
}

/// Lowercase ASCII slug with runs of other characters collapsed to `-`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn make_blog() -> Blog {
        Blog::new("Intro to Rust", Category::Programming, "Hello world of code", "ada").unwrap()
    }

    #[test]
    fn new_blog_is_draft() {
        let blog = make_blog();
        assert_eq!(blog.status, BlogStatus::Draft);
        assert_eq!(blog.slug, "intro-to-rust");
        assert_eq!(blog.views, 0);
        assert!(blog.id.to_string().starts_with("b-"));
    }

    #[test]
    fn title_is_validated() {
        assert_eq!(
            Blog::new("   ", Category::Other, "body", "ada").unwrap_err(),
            BlogError::EmptyTitle
        );
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(
            Blog::new(&long, Category::Other, "body", "ada").unwrap_err(),
            BlogError::TitleTooLong
        );
        assert!(Blog::new(&"x".repeat(MAX_TITLE_LEN), Category::Other, "body", "ada").is_ok());
    }

    #[test]
    fn content_is_required() {
        assert_eq!(
            Blog::new("Title", Category::Other, " \n ", "ada").unwrap_err(),
            BlogError::EmptyContent
        );
    }

    #[test]
    fn read_time_rounds_up() {
        assert_eq!(read_time_minutes(""), 0);
        assert_eq!(read_time_minutes("one"), 1);
        assert_eq!(read_time_minutes(&"word ".repeat(200)), 1);
        assert_eq!(read_time_minutes(&"word ".repeat(201)), 2);
    }

    #[test]
    fn set_content_recomputes_read_time() {
        let mut blog = make_blog();
        assert_eq!(blog.read_time, 1);

        blog.set_content("word ".repeat(450)).unwrap();
        assert_eq!(blog.read_time, 3);
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust -- 2024 "), "rust-2024");
        assert_eq!(slugify("C++ & Go"), "c-go");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("programming".parse::<Category>().unwrap(), Category::Programming);
        assert_eq!(" Career ".parse::<Category>().unwrap(), Category::Career);
        assert!(matches!(
            "Cooking".parse::<Category>(),
            Err(BlogError::UnknownCategory(_))
        ));
    }

    #[test]
    fn tags_are_cleaned() {
        let mut blog = make_blog();
        blog.set_tags(["rust", " rust ", "", "web"]);
        assert_eq!(blog.tags, vec!["rust", "web"]);
    }

    #[test]
    fn topics_include_category_and_tags() {
        let mut blog = make_blog();
        blog.set_tags(["AI", "ML"]);
        assert_eq!(blog.topics(), vec!["Programming", "AI", "ML"]);
    }

    #[test]
    fn toggle_like() {
        let mut blog = make_blog();

        assert!(blog.toggle_like("bob"));
        assert!(blog.is_liked_by("bob"));
        assert_eq!(blog.likes_count(), 1);

        assert!(!blog.toggle_like("bob"));
        assert!(!blog.is_liked_by("bob"));
        assert_eq!(blog.likes_count(), 0);
    }

    #[test]
    fn comments() {
        let mut blog = make_blog();

        assert_eq!(blog.add_comment("bob", "  "), Err(BlogError::EmptyComment));

        let comment = blog.add_comment("bob", " Nice post ").unwrap();
        assert_eq!(comment.text, "Nice post");
        assert_eq!(blog.comments_count(), 1);
    }

    #[test]
    fn author_or_admin_may_modify() {
        let blog = make_blog();
        let author = Actor::new("ada", Role::User);
        let stranger = Actor::new("eve", Role::User);
        let admin = Actor::new("root", Role::Admin);

        assert!(blog.can_modify(Some(&author)));
        assert!(blog.can_modify(Some(&admin)));
        assert!(!blog.can_modify(Some(&stranger)));
        assert!(!blog.can_modify(None));

        assert!(matches!(
            blog.ensure_can_modify(Some(&stranger), "delete"),
            Err(BlogError::Forbidden { .. })
        ));
        assert!(matches!(
            blog.ensure_can_modify(None, "delete"),
            Err(BlogError::Anonymous(_))
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let mut blog = make_blog();
        blog.set_tags(["rust"]);
        blog.add_comment("bob", "hi").unwrap();

        let json = serde_json::to_string(&blog).unwrap();
        let back: Blog = serde_json::from_str(&json).unwrap();
        assert_eq!(blog, back);
    }
}
