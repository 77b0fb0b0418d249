//! learnpath - A local-first blog catalog with learning path generation
//!
//! Blog posts live in a project directory as JSONL. From them, learnpath
//! builds study sequences: posts matching the learner's topics, ordered by
//! difficulty for their level and packed into a fixed hour budget.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    Blog, BlogId, Category, Course, CourseId, GenerationRequest, GenerationResult, Level,
    TimeBudget,
};
