use uuid::Uuid;

/// Row filter derived from the caller's effective role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Unfiltered.
    All,
    /// Only courses the instructor owns, and their assignments and submissions.
    Instructor(Uuid),
    /// Only courses the student is enrolled in, and the student's own submissions.
    Student(Uuid),
}

impl Scope {
    pub fn instructor_filter(&self) -> Option<Uuid> {
        match self {
            Scope::Instructor(id) => Some(*id),
            _ => None,
        }
    }

    pub fn student_filter(&self) -> Option<Uuid> {
        match self {
            Scope::Student(id) => Some(*id),
            _ => None,
        }
    }
}
