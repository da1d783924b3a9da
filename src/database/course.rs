use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::course::{Course, CourseRequest, EnrolledStudent, Enrollment};
use crate::models::scope::Scope;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create_course(&self, request: &CourseRequest, instructor_id: &Uuid) -> Result<Course, AppError>;
    /// `None` when the course does not exist or lies outside `scope`.
    async fn get_course(&self, id: &Uuid, scope: &Scope) -> Result<Option<Course>, AppError>;
    async fn list_courses(&self, scope: &Scope) -> Result<Vec<Course>, AppError>;
    async fn update_course(&self, id: &Uuid, request: &CourseRequest) -> Result<Course, AppError>;
    async fn delete_course(&self, id: &Uuid) -> Result<(), AppError>;
    async fn enroll(&self, course_id: &Uuid, student_id: &Uuid) -> Result<Enrollment, AppError>;
    async fn unenroll(&self, course_id: &Uuid, student_id: &Uuid) -> Result<bool, AppError>;
    async fn is_enrolled(&self, course_id: &Uuid, student_id: &Uuid) -> Result<bool, AppError>;
    async fn list_enrollments(&self, course_id: &Uuid) -> Result<Vec<EnrolledStudent>, AppError>;
}

// $1 = owning instructor filter, $2 = enrolled student filter; NULL disables the filter.
const SCOPED_COURSE_FILTER: &str = r#"
    ($1::uuid IS NULL OR c.instructor_id = $1)
    AND ($2::uuid IS NULL OR EXISTS (
        SELECT 1 FROM enrollments e WHERE e.course_id = c.id AND e.student_id = $2
    ))
"#;

#[async_trait::async_trait]
impl CourseRepository for PostgresRepository {
    async fn create_course(&self, request: &CourseRequest, instructor_id: &Uuid) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (code, title, description, department_id, instructor_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, code, title, description, department_id, instructor_id, created_at
            "#,
        )
        .bind(request.code.trim())
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.department_id)
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    async fn get_course(&self, id: &Uuid, scope: &Scope) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"
            SELECT c.id, c.code, c.title, c.description, c.department_id, c.instructor_id, c.created_at
            FROM courses c
            WHERE {SCOPED_COURSE_FILTER}
              AND c.id = $3
            "#
        ))
        .bind(scope.instructor_filter())
        .bind(scope.student_filter())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn list_courses(&self, scope: &Scope) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            r#"
            SELECT c.id, c.code, c.title, c.description, c.department_id, c.instructor_id, c.created_at
            FROM courses c
            WHERE {SCOPED_COURSE_FILTER}
            ORDER BY c.code
            "#
        ))
        .bind(scope.instructor_filter())
        .bind(scope.student_filter())
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    async fn update_course(&self, id: &Uuid, request: &CourseRequest) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET code = $1, title = $2, description = $3, department_id = $4
            WHERE id = $5
            RETURNING id, code, title, description, department_id, instructor_id, created_at
            "#,
        )
        .bind(request.code.trim())
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.department_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        course.ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    async fn delete_course(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM courses WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn enroll(&self, course_id: &Uuid, student_id: &Uuid) -> Result<Enrollment, AppError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (course_id, student_id)
            VALUES ($1, $2)
            RETURNING course_id, student_id, enrolled_at
            "#,
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Already enrolled in this course".to_string()),
            other => other,
        })?;

        Ok(enrollment)
    }

    async fn unenroll(&self, course_id: &Uuid, student_id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE course_id = $1 AND student_id = $2")
            .bind(course_id)
            .bind(student_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_enrolled(&self, course_id: &Uuid, student_id: &Uuid) -> Result<bool, AppError> {
        let enrolled = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM enrollments WHERE course_id = $1 AND student_id = $2)")
            .bind(course_id)
            .bind(student_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(enrolled)
    }

    async fn list_enrollments(&self, course_id: &Uuid) -> Result<Vec<EnrolledStudent>, AppError> {
        let students = sqlx::query_as::<_, EnrolledStudent>(
            r#"
            SELECT u.id AS user_id, u.email, u.full_name, u.student_id, e.enrolled_at
            FROM enrollments e
            JOIN users u ON u.id = e.student_id
            WHERE e.course_id = $1
            ORDER BY u.full_name, u.email
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }
}
