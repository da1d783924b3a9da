use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    /// Recorded owner of the course.
    pub instructor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct CourseRequest {
    #[validate(length(min = 2, max = 32))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    /// Required when an admin creates a course; ignored for instructors.
    pub instructor_id: Option<Uuid>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
    pub instructor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            code: course.code.clone(),
            title: course.title.clone(),
            description: course.description.clone(),
            department_id: course.department_id,
            instructor_id: course.instructor_id,
            created_at: course.created_at,
        }
    }
}

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct Enrollment {
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct EnrollmentResponse {
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

impl From<&Enrollment> for EnrollmentResponse {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            course_id: enrollment.course_id,
            student_id: enrollment.student_id,
            enrolled_at: enrollment.enrolled_at,
        }
    }
}

/// A student as listed on a course roster.
#[derive(Serialize, Debug, Clone, sqlx::FromRow, JsonSchema)]
pub struct EnrolledStudent {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub student_id: Option<String>,
    pub enrolled_at: DateTime<Utc>,
}
