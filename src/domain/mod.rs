//! Domain models for learnpath
//!
//! Contains the core business logic without any I/O concerns.

mod id;
mod blog;
mod catalog;
mod course;
mod user;
pub mod path;

pub use id::{BlogId, CourseId, IdError};
pub use blog::{slugify, read_time_minutes, Blog, BlogError, BlogStatus, Category, Comment};
pub use catalog::{list, popular, ListQuery, Page, SortKey};
pub use course::{enrolled_in, Course, CourseError, Lesson};
pub use user::{Actor, Role};
pub use path::{
    generate, ContentItem, GenerateError, GenerationRequest, GenerationResult, Level, PathEntry,
    TimeBudget,
};
