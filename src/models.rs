//! Frontend Models
//!
//! Course data as the editor sees it.

use serde::{Deserialize, Serialize};

/// Course record (matches the API's course structure fields we edit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_uuid: String,
    pub name: String,
    /// JSON list of learning items, or plain text on courses created
    /// before learnings were a list
    #[serde(default)]
    pub learnings: String,
}

/// Courses available before a backend is connected
const SAMPLE_COURSES: &str = r#"[
    {
        "course_uuid": "course_rust_intro",
        "name": "Intro to Rust",
        "learnings": "[{\"id\":\"1\",\"text\":\"Read and write ownership-safe code\",\"emoji\":\"🦀\"},{\"id\":\"2\",\"text\":\"Model errors with Result\",\"emoji\":\"📝\",\"link\":\"https://doc.rust-lang.org/book/ch09-00-error-handling.html\"}]"
    },
    {
        "course_uuid": "course_legacy_sql",
        "name": "SQL Basics",
        "learnings": "Write SELECT queries with joins"
    },
    {
        "course_uuid": "course_new",
        "name": "Untitled course"
    }
]"#;

pub fn parse_courses(raw: &str) -> Result<Vec<Course>, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn sample_courses() -> Vec<Course> {
    parse_courses(SAMPLE_COURSES).unwrap_or_else(|e| {
        log::error!("[Models] bad sample course data: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_courses_parse() {
        let courses = sample_courses();
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[2].learnings, "");
        assert!(courses[0].learnings.starts_with('['));
    }
}
