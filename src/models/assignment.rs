use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub max_points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct AssignmentRequest {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    #[validate(range(min = 1, max = 10000))]
    pub max_points: i32,
}

/// The owning course of an assignment is fixed once created.
#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct AssignmentUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    #[validate(range(min = 1, max = 10000))]
    pub max_points: i32,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub max_points: i32,
}

impl From<&Assignment> for AssignmentResponse {
    fn from(assignment: &Assignment) -> Self {
        Self {
            id: assignment.id,
            course_id: assignment.course_id,
            title: assignment.title.clone(),
            description: assignment.description.clone(),
            due_at: assignment.due_at,
            max_points: assignment.max_points,
        }
    }
}
