use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::scope::Scope;
use crate::models::submission::{Submission, SubmissionRequest};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn get_submission(&self, id: &Uuid, scope: &Scope) -> Result<Option<Submission>, AppError>;
    async fn get_submission_for(&self, assignment_id: &Uuid, student_id: &Uuid) -> Result<Option<Submission>, AppError>;
    async fn list_submissions(&self, scope: &Scope, assignment_id: Option<Uuid>) -> Result<Vec<Submission>, AppError>;
    /// Creates the student's submission or replaces it while it is still ungraded.
    /// Returns `None` when a graded submission already exists.
    async fn upsert_submission(&self, request: &SubmissionRequest, student_id: &Uuid) -> Result<Option<Submission>, AppError>;
    async fn grade_submission(&self, id: &Uuid, grade: i32, feedback: Option<&str>) -> Result<Submission, AppError>;
}

const SUBMISSION_COLUMNS: &str = "s.id, s.assignment_id, s.student_id, s.content, s.file_url, s.submitted_at, s.grade, s.feedback, s.graded_at";

// Instructors see submissions to their own courses, students only their own.
const SCOPED_SUBMISSION_FILTER: &str = r#"
    ($1::uuid IS NULL OR c.instructor_id = $1)
    AND ($2::uuid IS NULL OR s.student_id = $2)
"#;

#[async_trait::async_trait]
impl SubmissionRepository for PostgresRepository {
    async fn get_submission(&self, id: &Uuid, scope: &Scope) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS}
            FROM submissions s
            JOIN assignments a ON a.id = s.assignment_id
            JOIN courses c ON c.id = a.course_id
            WHERE {SCOPED_SUBMISSION_FILTER}
              AND s.id = $3
            "#
        ))
        .bind(scope.instructor_filter())
        .bind(scope.student_filter())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn get_submission_for(&self, assignment_id: &Uuid, student_id: &Uuid) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions s WHERE s.assignment_id = $1 AND s.student_id = $2"
        ))
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn list_submissions(&self, scope: &Scope, assignment_id: Option<Uuid>) -> Result<Vec<Submission>, AppError> {
        let submissions = sqlx::query_as::<_, Submission>(&format!(
            r#"
            SELECT {SUBMISSION_COLUMNS}
            FROM submissions s
            JOIN assignments a ON a.id = s.assignment_id
            JOIN courses c ON c.id = a.course_id
            WHERE {SCOPED_SUBMISSION_FILTER}
              AND ($3::uuid IS NULL OR s.assignment_id = $3)
            ORDER BY s.submitted_at DESC
            "#
        ))
        .bind(scope.instructor_filter())
        .bind(scope.student_filter())
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn upsert_submission(&self, request: &SubmissionRequest, student_id: &Uuid) -> Result<Option<Submission>, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (assignment_id, student_id, content, file_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (assignment_id, student_id) DO UPDATE
            SET content = EXCLUDED.content, file_url = EXCLUDED.file_url, submitted_at = now()
            WHERE submissions.graded_at IS NULL
            RETURNING id, assignment_id, student_id, content, file_url, submitted_at, grade, feedback, graded_at
            "#,
        )
        .bind(request.assignment_id)
        .bind(student_id)
        .bind(&request.content)
        .bind(&request.file_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn grade_submission(&self, id: &Uuid, grade: i32, feedback: Option<&str>) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET grade = $1, feedback = $2, graded_at = now()
            WHERE id = $3
            RETURNING id, assignment_id, student_id, content, file_url, submitted_at, grade, feedback, graded_at
            "#,
        )
        .bind(grade)
        .bind(feedback)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        submission.ok_or_else(|| AppError::NotFound("Submission not found".to_string()))
    }
}
