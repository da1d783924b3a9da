use crate::auth::role::Role;
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};
use zxcvbn::{Score, zxcvbn};

/// A row of the credential store.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    /// `None` when the stored value is NULL or outside the known set.
    pub role: Option<Role>,
    pub student_id: Option<String>,
    pub department_id: Option<Uuid>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct IdentityRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Option<String>,
    pub student_id: Option<String>,
    pub department_id: Option<Uuid>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            role: Role::from_db(row.role),
            student_id: row.student_id,
            department_id: row.department_id,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Everything needed to insert a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub student_id: Option<String>,
    pub department_id: Option<Uuid>,
    pub password_hash: String,
}

#[derive(Serialize, Debug, Clone, JsonSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    /// Effective role, not necessarily the stored one.
    pub role: Role,
    pub student_id: Option<String>,
    pub department_id: Option<Uuid>,
}

impl UserResponse {
    pub fn new(identity: &Identity, role: Role) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            full_name: identity.full_name.clone(),
            role,
            student_id: identity.student_id.clone(),
            department_id: identity.department_id,
        }
    }
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128), custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 32))]
    pub student_id: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct SessionResponse {
    pub token: String,
    pub expires: DateTime<Utc>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct SignInResponse {
    pub user: UserResponse,
    pub session: SessionResponse,
}

/// Self-service and admin profile edits. Email and role are not editable here.
#[derive(Deserialize, Debug, Clone, Validate, JsonSchema)]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 32))]
    pub student_id: Option<String>,
    pub department_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct PasswordChangeRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128), custom(function = "validate_password_strength"))]
    pub new_password: String,
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct RoleUpdateRequest {
    pub role: Role,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let entropy = zxcvbn(password, &[]);
    if matches!(entropy.score(), Score::Zero | Score::One | Score::Two) {
        let mut error = ValidationError::new("weak_password");
        error.message = Some("Password is too easy to guess".into());
        return Err(error);
    }
    Ok(())
}
