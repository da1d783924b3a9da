use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::department::{Department, DepartmentRequest};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn create_department(&self, request: &DepartmentRequest) -> Result<Department, AppError>;
    async fn get_department_by_id(&self, id: &Uuid) -> Result<Option<Department>, AppError>;
    async fn list_departments(&self) -> Result<Vec<Department>, AppError>;
    async fn update_department(&self, id: &Uuid, request: &DepartmentRequest) -> Result<Department, AppError>;
    async fn delete_department(&self, id: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl DepartmentRepository for PostgresRepository {
    async fn create_department(&self, request: &DepartmentRequest) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (code, name)
            VALUES ($1, $2)
            RETURNING id, code, name, created_at
            "#,
        )
        .bind(request.code.trim().to_ascii_uppercase())
        .bind(&request.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(department)
    }

    async fn get_department_by_id(&self, id: &Uuid) -> Result<Option<Department>, AppError> {
        let department = sqlx::query_as::<_, Department>("SELECT id, code, name, created_at FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(department)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>("SELECT id, code, name, created_at FROM departments ORDER BY code")
            .fetch_all(&self.pool)
            .await?;

        Ok(departments)
    }

    async fn update_department(&self, id: &Uuid, request: &DepartmentRequest) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET code = $1, name = $2
            WHERE id = $3
            RETURNING id, code, name, created_at
            "#,
        )
        .bind(request.code.trim().to_ascii_uppercase())
        .bind(&request.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        department.ok_or_else(|| AppError::NotFound("Department not found".to_string()))
    }

    async fn delete_department(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Department not found".to_string()));
        }
        Ok(())
    }
}
