use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct Department {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct DepartmentRequest {
    #[validate(length(min = 2, max = 16))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

impl From<&Department> for DepartmentResponse {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id,
            code: department.code.clone(),
            name: department.name.clone(),
        }
    }
}
