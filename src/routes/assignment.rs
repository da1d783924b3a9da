use crate::auth::CurrentUser;
use crate::database::postgres_repository::Repo;
use crate::error::app_error::AppError;
use crate::models::assignment::{AssignmentRequest, AssignmentResponse, AssignmentUpdateRequest};
use crate::service::assignment::AssignmentService;
use rocket::http::Status;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_okapi::openapi;
use uuid::Uuid;
use validator::Validate;

pub(crate) fn parse_optional_uuid(value: Option<&str>) -> Result<Option<Uuid>, AppError> {
    value.map(Uuid::parse_str).transpose().map_err(AppError::from)
}

/// Create an assignment in a course the caller teaches
#[openapi(tag = "Assignments")]
#[post("/", data = "<payload>")]
pub async fn create_assignment(
    repo: &State<Repo>,
    current_user: CurrentUser,
    payload: Json<AssignmentRequest>,
) -> Result<Created<Json<AssignmentResponse>>, AppError> {
    payload.validate()?;

    let service = AssignmentService::new(repo.inner().as_ref());
    let assignment = service.create(&current_user, &payload).await?;
    Ok(Created::new(format!("/assignments/{}", assignment.id)).body(Json(AssignmentResponse::from(&assignment))))
}

/// List assignments visible to the caller, optionally for one course
#[openapi(tag = "Assignments")]
#[get("/?<course_id>")]
pub async fn list_assignments(repo: &State<Repo>, current_user: CurrentUser, course_id: Option<&str>) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let course_id = parse_optional_uuid(course_id)?;
    let assignments = repo.list_assignments(&current_user.scope(), course_id).await?;
    Ok(Json(assignments.iter().map(AssignmentResponse::from).collect()))
}

/// Get an assignment by id
#[openapi(tag = "Assignments")]
#[get("/<id>")]
pub async fn get_assignment(repo: &State<Repo>, current_user: CurrentUser, id: &str) -> Result<Json<AssignmentResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = AssignmentService::new(repo.inner().as_ref());
    let assignment = service.visible_assignment(&current_user, &uuid).await?;
    Ok(Json(AssignmentResponse::from(&assignment)))
}

/// Update an assignment
#[openapi(tag = "Assignments")]
#[put("/<id>", data = "<payload>")]
pub async fn put_assignment(
    repo: &State<Repo>,
    current_user: CurrentUser,
    id: &str,
    payload: Json<AssignmentUpdateRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;
    payload.validate()?;

    let service = AssignmentService::new(repo.inner().as_ref());
    let assignment = service.update(&current_user, &uuid, &payload).await?;
    Ok(Json(AssignmentResponse::from(&assignment)))
}

/// Delete an assignment and its submissions
#[openapi(tag = "Assignments")]
#[delete("/<id>")]
pub async fn delete_assignment(repo: &State<Repo>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = AssignmentService::new(repo.inner().as_ref());
    service.delete(&current_user, &uuid).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_assignment, list_assignments, get_assignment, put_assignment, delete_assignment]
}
