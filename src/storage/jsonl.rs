//! JSONL storage for blogs and courses
//!
//! Records are stored one JSON object per line, blogs in
//! `.learnpath/blogs.jsonl` and courses in `.learnpath/courses.jsonl`.
//! Uses file locking for concurrent access safety.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::hash::Hash;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Blog, BlogId, Course, CourseId};

/// A record kept in a JSONL store
pub trait Record: Serialize + DeserializeOwned + Clone {
    type Id: Clone + Eq + Hash + Ord + Display;

    /// Capitalized noun used in messages
    const NOUN: &'static str;

    /// File name under `.learnpath/`
    const FILE_NAME: &'static str;

    fn id(&self) -> &Self::Id;

    fn created_at(&self) -> DateTime<Utc>;
}

impl Record for Blog {
    type Id = BlogId;
    const NOUN: &'static str = "Blog";
    const FILE_NAME: &'static str = "blogs.jsonl";

    fn id(&self) -> &BlogId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Record for Course {
    type Id = CourseId;
    const NOUN: &'static str = "Course";
    const FILE_NAME: &'static str = "courses.jsonl";

    fn id(&self) -> &CourseId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Store for blog posts
pub type BlogStore = JsonlStore<Blog>;

/// Store for courses
pub type CourseStore = JsonlStore<Course>;

/// Store for records in JSONL format
pub struct JsonlStore<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

fn creation_order<T: Record>(a: &T, b: &T) -> std::cmp::Ordering {
    a.created_at().cmp(&b.created_at()).then_with(|| a.id().cmp(b.id()))
}

impl<T: Record> JsonlStore<T> {
    /// Creates a new store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".learnpath").join(T::FILE_NAME))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> String {
        T::NOUN.to_lowercase()
    }

    /// Reads all records from the store
    ///
    /// A later line for the same ID replaces an earlier one. Any line that
    /// does not parse fails the whole read.
    pub fn read_all(&self) -> Result<HashMap<T::Id, T>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let file = File::open(&self.path).with_context(|| {
            format!("Failed to open {} store: {}", self.kind(), self.path.display())
        })?;

        // Acquire shared lock for reading
        file.lock_shared()
            .with_context(|| format!("Failed to acquire read lock on {} store", self.kind()))?;

        let reader = BufReader::new(&file);
        let mut records = HashMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: T = serde_json::from_str(&line).with_context(|| {
                format!("Failed to parse {} at line {}", self.kind(), line_num + 1)
            })?;

            records.insert(record.id().clone(), record);
        }

        debug!(kind = T::NOUN, count = records.len(), path = %self.path.display(), "read store");

        // Lock is released when file is dropped
        Ok(records)
    }

    /// Reads all records in creation order (ID breaks ties)
    pub fn read_ordered(&self) -> Result<Vec<T>> {
        let mut records: Vec<T> = self.read_all()?.into_values().collect();
        records.sort_by(creation_order);
        Ok(records)
    }

    /// Reads a single record
    pub fn get(&self, id: &T::Id) -> Result<Option<T>> {
        Ok(self.read_all()?.remove(id))
    }

    /// Reads a single record, failing if it does not exist
    pub fn require(&self, id: &T::Id) -> Result<T> {
        self.get(id)?
            .ok_or_else(|| anyhow::anyhow!("{} not found: {}", T::NOUN, id))
    }

    /// Writes all records to the store (full rewrite)
    pub fn write_all(&self, records: &HashMap<T::Id, T>) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .with_context(|| format!("Failed to acquire write lock on {} store", self.kind()))?;

            let mut writer = BufWriter::new(&file);

            // Creation order keeps the file stable across rewrites
            let mut sorted: Vec<_> = records.values().collect();
            sorted.sort_by(|a, b| creation_order(*a, *b));

            for record in sorted {
                let line = serde_json::to_string(record)
                    .with_context(|| format!("Failed to serialize {}", self.kind()))?;
                writeln!(writer, "{}", line)
                    .with_context(|| format!("Failed to write {}", self.kind()))?;
            }

            writer
                .flush()
                .with_context(|| format!("Failed to flush {} store", self.kind()))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Appends a single record (used for adds without full rewrite)
    pub fn append(&self, record: &T) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| {
                format!("Failed to open {} store: {}", self.kind(), self.path.display())
            })?;

        // Acquire exclusive lock
        file.lock_exclusive()
            .with_context(|| format!("Failed to acquire write lock on {} store", self.kind()))?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(record)
            .with_context(|| format!("Failed to serialize {}", self.kind()))?;
        writeln!(writer, "{}", line).with_context(|| format!("Failed to write {}", self.kind()))?;

        writer
            .flush()
            .with_context(|| format!("Failed to flush {} store", self.kind()))?;

        Ok(())
    }

    /// Updates a single record (reads all, updates, writes all)
    pub fn update(&self, record: &T) -> Result<()> {
        let mut records = self.read_all()?;
        records.insert(record.id().clone(), record.clone());
        self.write_all(&records)
    }

    /// Removes a record by ID
    pub fn remove(&self, id: &T::Id) -> Result<bool> {
        let mut records = self.read_all()?;
        let removed = records.remove(id).is_some();
        if removed {
            self.write_all(&records)?;
        }
        Ok(removed)
    }

    /// Compacts the store (drops superseded lines, rewrites clean)
    pub fn compact(&self) -> Result<usize> {
        let records = self.read_all()?;
        let count = records.len();
        self.write_all(&records)?;
        Ok(count)
    }
}
