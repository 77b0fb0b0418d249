//! Course CLI commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tracing::debug;

use super::output::truncate;
use super::session::Session;
use crate::domain::{enrolled_in, Course, CourseId};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum CourseCommands {
    /// Create a course
    ///
    /// Examples:
    ///   learnpath course add "Web Design Bootcamp" -d "Learn web design from scratch"
    ///   learnpath course add Graphics -d "Photoshop and Figma" --price 49 --lesson Basics
    Add {
        /// Course title
        title: String,

        /// What the course covers
        #[arg(long, short = 'd')]
        description: String,

        /// Instructor name (defaults to the acting user)
        #[arg(long)]
        instructor: Option<String>,

        /// Price; 0 means free
        #[arg(long, default_value = "0")]
        price: f64,

        /// Image URL or path
        #[arg(long)]
        image: Option<String>,

        /// Lesson title (repeatable, kept in order)
        #[arg(long = "lesson")]
        lessons: Vec<String>,
    },

    /// Append a lesson to a course you teach
    Lesson {
        /// Course ID
        id: String,

        /// Lesson title
        title: String,

        /// Lesson body
        #[arg(long, default_value = "")]
        content: String,

        /// Video URL
        #[arg(long)]
        video_url: Option<String>,
    },

    /// List all courses
    List,

    /// Show a course with its lessons and learners
    Show {
        /// Course ID
        id: String,
    },

    /// Enroll in a course
    Enroll {
        /// Course ID
        id: String,
    },

    /// List the courses you are enrolled in
    Mine {
        /// Show another learner's courses
        #[arg(long)]
        user: Option<String>,
    },
}

/// A course as shown to the current session
#[derive(Serialize)]
struct CourseView<'a> {
    #[serde(flatten)]
    course: &'a Course,
    lessons_count: usize,
    enrolled_count: usize,
    /// Whether the acting user is enrolled
    enrolled: bool,
}

impl<'a> CourseView<'a> {
    fn new(course: &'a Course, session: &Session) -> Self {
        Self {
            course,
            lessons_count: course.lessons.len(),
            enrolled_count: course.enrolled_count(),
            enrolled: session.actor().is_some_and(|a| course.is_enrolled(&a.name)),
        }
    }
}

pub fn run(cmd: CourseCommands, session: &Session) -> Result<()> {
    match cmd {
        CourseCommands::Add {
            title,
            description,
            instructor,
            price,
            image,
            lessons,
        } => {
            let draft = NewCourse {
                title,
                description,
                instructor,
                price,
                image,
                lessons,
            };
            add_course(session, draft)
        }
        CourseCommands::Lesson {
            id,
            title,
            content,
            video_url,
        } => add_lesson(session, &id, &title, content, video_url),
        CourseCommands::List => list_courses(session),
        CourseCommands::Show { id } => show_course(session, &id),
        CourseCommands::Enroll { id } => enroll(session, &id),
        CourseCommands::Mine { user } => my_courses(session, user.as_deref()),
    }
}

struct NewCourse {
    title: String,
    description: String,
    instructor: Option<String>,
    price: f64,
    image: Option<String>,
    lessons: Vec<String>,
}

fn format_price(course: &Course) -> String {
    if course.is_free() {
        "Free".to_string()
    } else {
        format!("{:.2}", course.price)
    }
}

fn add_course(session: &Session, draft: NewCourse) -> Result<()> {
    let actor = session.require_actor("create a course")?;
    let project = Project::open_current()?;

    let instructor = draft.instructor.as_deref().unwrap_or(&actor.name);
    let mut course = Course::new(&draft.title, &draft.description, instructor, draft.price)?;
    course.image = draft.image;
    for lesson in &draft.lessons {
        course.add_lesson(lesson, "", None)?;
    }

    project.course_store().append(&course)?;
    debug!(id = %course.id, instructor = %course.instructor, "created course");

    if session.output.is_json() {
        session.output.data(&CourseView::new(&course, session));
    } else {
        session
            .output
            .success(&format!("Created course: {} - {}", course.id, course.title));
    }

    Ok(())
}

fn add_lesson(
    session: &Session,
    id_str: &str,
    title: &str,
    content: String,
    video_url: Option<String>,
) -> Result<()> {
    let actor = session.require_actor("add a lesson")?;
    let project = Project::open_current()?;
    let store = project.course_store();
    let id: CourseId = id_str.parse()?;

    let mut course = store.require(&id)?;
    course.ensure_can_manage(actor, "add a lesson to")?;
    let lesson = course.add_lesson(title, content, video_url)?.clone();
    store.update(&course)?;

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "id": course.id,
            "lesson": lesson,
            "lessons_count": course.lessons.len(),
        }));
    } else {
        session.output.success(&format!(
            "Added lesson {} to {}: {}",
            course.lessons.len(),
            course.id,
            lesson.title
        ));
    }

    Ok(())
}

fn print_table(courses: &[&Course]) {
    println!(
        "{:<10} {:>8} {:>7} {:>8} {:<16} TITLE",
        "ID", "PRICE", "LESSONS", "ENROLLED", "INSTRUCTOR"
    );
    println!("{}", "-".repeat(80));
    for course in courses {
        println!(
            "{:<10} {:>8} {:>7} {:>8} {:<16} {}",
            course.id,
            format_price(course),
            course.lessons.len(),
            course.enrolled_count(),
            truncate(&course.instructor, 16),
            truncate(&course.title, 30)
        );
    }
}

fn list_courses(session: &Session) -> Result<()> {
    let project = Project::open_current()?;
    let courses = project.course_store().read_ordered()?;

    if session.output.is_json() {
        let views: Vec<_> = courses.iter().map(|c| CourseView::new(c, session)).collect();
        session.output.data(&views);
    } else if courses.is_empty() {
        println!("No courses found");
    } else {
        let refs: Vec<&Course> = courses.iter().collect();
        print_table(&refs);
    }

    Ok(())
}

fn show_course(session: &Session, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let id: CourseId = id_str.parse()?;
    let course = project.course_store().require(&id)?;

    if session.output.is_json() {
        session.output.data(&CourseView::new(&course, session));
        return Ok(());
    }

    println!("{}  {}", course.id, course.title);
    println!("{}", "=".repeat(60));
    println!("Instructor: {}", course.instructor);
    println!("Price:      {}", format_price(&course));
    println!("Enrolled:   {}", course.enrolled_count());
    if let Some(actor) = session.actor() {
        if course.is_enrolled(&actor.name) {
            println!("You are enrolled in this course");
        }
    }
    println!();
    println!("{}", course.description);

    if !course.lessons.is_empty() {
        println!();
        println!("Lessons ({}):", course.lessons.len());
        for (i, lesson) in course.lessons.iter().enumerate() {
            match &lesson.video_url {
                Some(url) => println!("  {}. {} [{}]", i + 1, lesson.title, url),
                None => println!("  {}. {}", i + 1, lesson.title),
            }
        }
    }

    if !course.enrolled_students.is_empty() {
        println!();
        println!("Learners: {}", course.enrolled_students.join(", "));
    }

    Ok(())
}

fn enroll(session: &Session, id_str: &str) -> Result<()> {
    let actor = session.require_actor("enroll in a course")?;
    let project = Project::open_current()?;
    let store = project.course_store();
    let id: CourseId = id_str.parse()?;

    let mut course = store.require(&id)?;
    course.enroll(&actor.name)?;
    store.update(&course)?;
    debug!(id = %course.id, user = %actor.name, "enrolled");

    if session.output.is_json() {
        session.output.data(&serde_json::json!({
            "success": true,
            "message": "Successfully enrolled in course",
            "course": CourseView::new(&course, session),
        }));
    } else {
        session
            .output
            .success(&format!("Enrolled in {} - {}", course.id, course.title));
    }

    Ok(())
}

fn my_courses(session: &Session, user: Option<&str>) -> Result<()> {
    let name = match user {
        Some(name) => name,
        None => session.require_actor("list your courses")?.name.as_str(),
    };
    let project = Project::open_current()?;
    let courses = project.course_store().read_all()?;
    let mine = enrolled_in(courses.values(), name);

    if session.output.is_json() {
        let views: Vec<_> = mine.iter().map(|c| CourseView::new(c, session)).collect();
        session.output.data(&views);
    } else if mine.is_empty() {
        println!("{} is not enrolled in any courses", name);
    } else {
        print_table(&mine);
    }

    Ok(())
}
