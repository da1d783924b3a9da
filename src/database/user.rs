use crate::auth::role::Role;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{Identity, IdentityRow, NewIdentity, ProfileUpdateRequest};
use uuid::Uuid;

const IDENTITY_COLUMNS: &str = "id, email, full_name, role, student_id, department_id, password_hash, created_at";

/// Access to the credential store.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_identity(&self, identity: &NewIdentity) -> Result<Identity, AppError>;
    async fn get_identity_by_id(&self, id: &Uuid) -> Result<Option<Identity>, AppError>;
    async fn get_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AppError>;
    async fn list_identities(&self) -> Result<Vec<Identity>, AppError>;
    async fn update_profile(&self, id: &Uuid, request: &ProfileUpdateRequest) -> Result<Identity, AppError>;
    async fn update_role(&self, id: &Uuid, role: Role) -> Result<Identity, AppError>;
    async fn update_password_hash(&self, id: &Uuid, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    async fn create_identity(&self, identity: &NewIdentity) -> Result<Identity, AppError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            INSERT INTO users (email, full_name, role, student_id, department_id, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {IDENTITY_COLUMNS}
            "#
        ))
        .bind(&identity.email)
        .bind(&identity.full_name)
        .bind(identity.role.as_str())
        .bind(&identity.student_id)
        .bind(identity.department_id)
        .bind(&identity.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_identity_by_id(&self, id: &Uuid) -> Result<Option<Identity>, AppError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!("SELECT {IDENTITY_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Identity::from))
    }

    async fn get_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!("SELECT {IDENTITY_COLUMNS} FROM users WHERE lower(email) = lower($1)"))
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Identity::from))
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, AppError> {
        let rows = sqlx::query_as::<_, IdentityRow>(&format!("SELECT {IDENTITY_COLUMNS} FROM users ORDER BY full_name, email"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Identity::from).collect())
    }

    async fn update_profile(&self, id: &Uuid, request: &ProfileUpdateRequest) -> Result<Identity, AppError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            UPDATE users
            SET full_name = $1, student_id = $2, department_id = $3
            WHERE id = $4
            RETURNING {IDENTITY_COLUMNS}
            "#
        ))
        .bind(&request.full_name)
        .bind(&request.student_id)
        .bind(request.department_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Identity::from).ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn update_role(&self, id: &Uuid, role: Role) -> Result<Identity, AppError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!("UPDATE users SET role = $1 WHERE id = $2 RETURNING {IDENTITY_COLUMNS}"))
            .bind(role.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Identity::from).ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn update_password_hash(&self, id: &Uuid, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}
