//! Catalog queries over blog posts
//!
//! Listing with filtering, sorting and pagination, and the popular-posts
//! ranking. These work on an in-memory snapshot of the store.

use serde::Serialize;

use super::blog::{Blog, Category};

/// Sort key for blog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first (`-created`)
    #[default]
    NewestFirst,
    /// Oldest first (`created`)
    OldestFirst,
    /// Alphabetical by title (`title`)
    Title,
    /// Most viewed first (`-views`)
    MostViewed,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-created" | "-createdAt" | "newest" => Ok(SortKey::NewestFirst),
            "created" | "createdAt" | "oldest" => Ok(SortKey::OldestFirst),
            "title" => Ok(SortKey::Title),
            "-views" | "views" => Ok(SortKey::MostViewed),
            _ => Err(format!(
                "Unknown sort key: {} (expected -created, created, title or -views)",
                s
            )),
        }
    }
}

/// Listing parameters
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub category: Option<Category>,
    pub include_drafts: bool,
    pub sort: SortKey,
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            category: None,
            include_drafts: false,
            sort: SortKey::default(),
            page: 1,
            limit: 10,
        }
    }
}

/// One page of a listing
#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub results: usize,
    pub total: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub data: Vec<&'a Blog>,
}

/// Filters, sorts and paginates `blogs`
pub fn list<'a>(blogs: impl IntoIterator<Item = &'a Blog>, query: &ListQuery) -> Page<'a> {
    let mut matching: Vec<&Blog> = blogs
        .into_iter()
        .filter(|b| query.include_drafts || b.is_published())
        .filter(|b| query.category.map_or(true, |c| b.category == c))
        .collect();

    match query.sort {
        SortKey::NewestFirst => matching.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::OldestFirst => matching.sort_by(|a, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::Title => matching.sort_by(|a, b| {
            a.title.to_lowercase().cmp(&b.title.to_lowercase()).then_with(|| a.id.cmp(&b.id))
        }),
        SortKey::MostViewed => {
            matching.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.id.cmp(&b.id)))
        }
    }

    let limit = query.limit.max(1);
    let page = query.page.max(1);
    let total = matching.len();
    let total_pages = total.div_ceil(limit);

    let data: Vec<&Blog> = matching
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    Page {
        results: data.len(),
        total,
        total_pages,
        current_page: page,
        data,
    }
}

/// Published posts by views, then likes, most popular first
pub fn popular<'a>(blogs: impl IntoIterator<Item = &'a Blog>, limit: usize) -> Vec<&'a Blog> {
    let mut published: Vec<&Blog> = blogs.into_iter().filter(|b| b.is_published()).collect();

    published.sort_by(|a, b| {
        b.views
            .cmp(&a.views)
            .then_with(|| b.likes_count().cmp(&a.likes_count()))
            .then_with(|| a.id.cmp(&b.id))
    });
    published.truncate(limit);
    published
}
