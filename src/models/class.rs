use serde::{Deserialize, Serialize};

/// A class (batch): a cohort of students following one curriculum track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    /// Unique class identifier.
    pub id: String,
    /// Display name (e.g., "CSE 3A").
    pub name: String,
    /// Batch label (e.g., "2024").
    pub batch: String,
    /// Semester number.
    pub semester: u32,
    /// Owning department.
    pub department: String,
    /// Number of enrolled students.
    pub student_count: u32,
    /// Names of the subjects this class requires.
    pub subjects: Vec<String>,
}

impl Class {
    /// Creates a class with no subjects.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            batch: String::new(),
            semester: 1,
            department: String::new(),
            student_count: 0,
            subjects: Vec::new(),
        }
    }

    /// Sets the batch label.
    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = batch.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u32) -> Self {
        self.semester = semester;
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Sets the student count.
    pub fn with_students(mut self, count: u32) -> Self {
        self.student_count = count;
        self
    }

    /// Adds a required subject by name.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Whether the class requires a subject.
    pub fn requires(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_builder() {
        let c = Class::new("C1", "CSE 3A")
            .with_batch("2024")
            .with_semester(3)
            .with_department("CSE")
            .with_students(45)
            .with_subject("Algorithms")
            .with_subject("Databases");
        assert_eq!(c.batch, "2024");
        assert_eq!(c.semester, 3);
        assert_eq!(c.student_count, 45);
        assert!(c.requires("Databases"));
        assert!(!c.requires("Physics"));
    }
}
