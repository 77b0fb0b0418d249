//! Course domain model
//!
//! Courses are instructor-led sequences of lessons. Learners enroll by name;
//! each learner may enroll in a given course once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::CourseId;
use super::user::Actor;

#[derive(Debug, Error, PartialEq)]
pub enum CourseError {
    #[error("A course must have a title")]
    EmptyTitle,

    #[error("A course must have a description")]
    EmptyDescription,

    #[error("A course must have an instructor")]
    EmptyInstructor,

    #[error("Invalid price: {0} (expected a non-negative number)")]
    InvalidPrice(String),

    #[error("A lesson must have a title")]
    EmptyLessonTitle,

    #[error("{user} is already enrolled in course {id}")]
    AlreadyEnrolled { id: CourseId, user: String },

    #[error("Not authorized to {action} course {id}")]
    Forbidden { action: String, id: CourseId },
}

/// One lesson of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// A course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,

    pub title: String,

    pub description: String,

    /// Name of the instructor, who may manage the lessons
    pub instructor: String,

    /// Price in the catalog's currency; zero means free
    #[serde(default)]
    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lessons: Vec<Lesson>,

    /// Names of enrolled learners, in enrollment order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrolled_students: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(
        title: &str,
        description: &str,
        instructor: &str,
        price: f64,
    ) -> Result<Self, CourseError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        if description.trim().is_empty() {
            return Err(CourseError::EmptyDescription);
        }
        if instructor.trim().is_empty() {
            return Err(CourseError::EmptyInstructor);
        }
        validate_price(price)?;

        let now = Utc::now();
        Ok(Self {
            id: CourseId::new(title, now),
            title: title.to_string(),
            description: description.trim().to_string(),
            instructor: instructor.trim().to_string(),
            price,
            image: None,
            lessons: Vec::new(),
            enrolled_students: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }

    /// Appends a lesson
    pub fn add_lesson(
        &mut self,
        title: &str,
        content: impl Into<String>,
        video_url: Option<String>,
    ) -> Result<&Lesson, CourseError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CourseError::EmptyLessonTitle);
        }

        self.lessons.push(Lesson {
            title: title.to_string(),
            content: content.into(),
            video_url: video_url.filter(|u| !u.trim().is_empty()),
        });
        self.updated_at = Utc::now();

        Ok(&self.lessons[self.lessons.len() - 1])
    }

    /// Enrolls `user`, rejecting a second enrollment
    pub fn enroll(&mut self, user: &str) -> Result<(), CourseError> {
        if self.is_enrolled(user) {
            return Err(CourseError::AlreadyEnrolled {
                id: self.id.clone(),
                user: user.to_string(),
            });
        }

        self.enrolled_students.push(user.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_enrolled(&self, user: &str) -> bool {
        self.enrolled_students.iter().any(|s| s == user)
    }

    pub fn enrolled_count(&self) -> usize {
        self.enrolled_students.len()
    }

    /// Only the instructor or an admin may manage a course
    pub fn ensure_can_manage(&self, actor: &Actor, action: &str) -> Result<(), CourseError> {
        if actor.is_admin() || actor.name == self.instructor {
            Ok(())
        } else {
            Err(CourseError::Forbidden {
                action: action.to_string(),
                id: self.id.clone(),
            })
        }
    }
}

fn validate_price(price: f64) -> Result<(), CourseError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(CourseError::InvalidPrice(price.to_string()))
    }
}

/// Courses `user` is enrolled in, oldest first
pub fn enrolled_in<'a>(
    courses: impl IntoIterator<Item = &'a Course>,
    user: &str,
) -> Vec<&'a Course> {
    let mut mine: Vec<&Course> = courses.into_iter().filter(|c| c.is_enrolled(user)).collect();
    mine.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    mine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn make_course() -> Course {
        Course::new("Web Design Bootcamp", "Learn web design from scratch", "John Doe", 0.0)
            .unwrap()
    }

    #[test]
    fn new_course_validates_required_fields() {
        assert_eq!(
            Course::new("  ", "desc", "John", 0.0).unwrap_err(),
            CourseError::EmptyTitle
        );
        assert_eq!(
            Course::new("Title", "", "John", 0.0).unwrap_err(),
            CourseError::EmptyDescription
        );
        assert_eq!(
            Course::new("Title", "desc", " ", 0.0).unwrap_err(),
            CourseError::EmptyInstructor
        );
        assert!(matches!(
            Course::new("Title", "desc", "John", -1.0),
            Err(CourseError::InvalidPrice(_))
        ));
        assert!(matches!(
            Course::new("Title", "desc", "John", f64::NAN),
            Err(CourseError::InvalidPrice(_))
        ));
    }

    #[test]
    fn new_course_is_free_and_empty() {
        let course = make_course();
        assert!(course.id.to_string().starts_with("c-"));
        assert!(course.is_free());
        assert!(course.lessons.is_empty());
        assert_eq!(course.enrolled_count(), 0);
    }

    #[test]
    fn enroll_rejects_second_enrollment() {
        let mut course = make_course();

        course.enroll("ada").unwrap();
        assert!(course.is_enrolled("ada"));

        let err = course.enroll("ada").unwrap_err();
        assert_eq!(
            err,
            CourseError::AlreadyEnrolled {
                id: course.id.clone(),
                user: "ada".to_string(),
            }
        );
        assert_eq!(course.enrolled_count(), 1);

        course.enroll("bob").unwrap();
        assert_eq!(course.enrolled_students, vec!["ada", "bob"]);
    }

    #[test]
    fn lessons_keep_their_order() {
        let mut course = make_course();
        course.add_lesson("Introduction to HTML", "Basics", None).unwrap();
        course
            .add_lesson("CSS Fundamentals", "", Some("https://example.com/v2".into()))
            .unwrap();

        let titles: Vec<_> = course.lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Introduction to HTML", "CSS Fundamentals"]);
        assert_eq!(
            course.add_lesson(" ", "", None).unwrap_err(),
            CourseError::EmptyLessonTitle
        );
    }

    #[test]
    fn only_instructor_or_admin_manages() {
        let course = make_course();

        assert!(course.ensure_can_manage(&Actor::new("John Doe", Role::User), "edit").is_ok());
        assert!(course.ensure_can_manage(&Actor::new("root", Role::Admin), "edit").is_ok());
        assert!(matches!(
            course.ensure_can_manage(&Actor::new("eve", Role::User), "edit"),
            Err(CourseError::Forbidden { .. })
        ));
    }

    #[test]
    fn enrolled_in_filters_by_learner() {
        let mut first = make_course();
        let mut second = Course::new("Graphics", "Photoshop and Figma", "Jane", 49.0).unwrap();
        let third = Course::new("Unrelated", "Nobody here", "Jane", 0.0).unwrap();
        second.created_at = first.created_at + chrono::Duration::seconds(1);

        first.enroll("ada").unwrap();
        second.enroll("ada").unwrap();
        second.enroll("bob").unwrap();

        let courses = vec![second.clone(), third, first.clone()];
        let titles: Vec<_> = enrolled_in(&courses, "ada")
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec![first.title.as_str(), second.title.as_str()]);
        assert_eq!(enrolled_in(&courses, "bob").len(), 1);
        assert!(enrolled_in(&courses, "eve").is_empty());
    }
}
