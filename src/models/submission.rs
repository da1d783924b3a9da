use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub content: String,
    pub file_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.graded_at.is_some()
    }
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct SubmissionRequest {
    pub assignment_id: Uuid,
    #[validate(length(min = 1, max = 100000))]
    pub content: String,
    /// Link to a file hosted elsewhere; uploads are not handled here.
    #[validate(url)]
    pub file_url: Option<String>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct GradeRequest {
    #[validate(range(min = 0))]
    pub grade: i32,
    #[validate(length(max = 10000))]
    pub feedback: Option<String>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub content: String,
    pub file_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
}

impl From<&Submission> for SubmissionResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            content: submission.content.clone(),
            file_url: submission.file_url.clone(),
            submitted_at: submission.submitted_at,
            grade: submission.grade,
            feedback: submission.feedback.clone(),
            graded_at: submission.graded_at,
        }
    }
}
