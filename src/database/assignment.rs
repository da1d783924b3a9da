use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::assignment::{Assignment, AssignmentRequest, AssignmentUpdateRequest};
use crate::models::scope::Scope;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create_assignment(&self, request: &AssignmentRequest) -> Result<Assignment, AppError>;
    async fn get_assignment(&self, id: &Uuid, scope: &Scope) -> Result<Option<Assignment>, AppError>;
    async fn list_assignments(&self, scope: &Scope, course_id: Option<Uuid>) -> Result<Vec<Assignment>, AppError>;
    async fn update_assignment(&self, id: &Uuid, request: &AssignmentUpdateRequest) -> Result<Assignment, AppError>;
    async fn delete_assignment(&self, id: &Uuid) -> Result<(), AppError>;
}

const ASSIGNMENT_COLUMNS: &str = "a.id, a.course_id, a.title, a.description, a.due_at, a.max_points, a.created_at";

#[async_trait::async_trait]
impl AssignmentRepository for PostgresRepository {
    async fn create_assignment(&self, request: &AssignmentRequest) -> Result<Assignment, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (course_id, title, description, due_at, max_points)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, course_id, title, description, due_at, max_points, created_at
            "#,
        )
        .bind(request.course_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_at)
        .bind(request.max_points)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn get_assignment(&self, id: &Uuid, scope: &Scope) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
            FROM assignments a
            JOIN courses c ON c.id = a.course_id
            WHERE ($1::uuid IS NULL OR c.instructor_id = $1)
              AND ($2::uuid IS NULL OR EXISTS (
                  SELECT 1 FROM enrollments e WHERE e.course_id = c.id AND e.student_id = $2
              ))
              AND a.id = $3
            "#
        ))
        .bind(scope.instructor_filter())
        .bind(scope.student_filter())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn list_assignments(&self, scope: &Scope, course_id: Option<Uuid>) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
            FROM assignments a
            JOIN courses c ON c.id = a.course_id
            WHERE ($1::uuid IS NULL OR c.instructor_id = $1)
              AND ($2::uuid IS NULL OR EXISTS (
                  SELECT 1 FROM enrollments e WHERE e.course_id = c.id AND e.student_id = $2
              ))
              AND ($3::uuid IS NULL OR a.course_id = $3)
            ORDER BY a.due_at, a.title
            "#
        ))
        .bind(scope.instructor_filter())
        .bind(scope.student_filter())
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    async fn update_assignment(&self, id: &Uuid, request: &AssignmentUpdateRequest) -> Result<Assignment, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET title = $1, description = $2, due_at = $3, max_points = $4
            WHERE id = $5
            RETURNING id, course_id, title, description, due_at, max_points, created_at
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_at)
        .bind(request.max_points)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        assignment.ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
    }

    async fn delete_assignment(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM assignments WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
