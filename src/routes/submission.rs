use crate::auth::CurrentUser;
use crate::database::postgres_repository::Repo;
use crate::error::app_error::AppError;
use crate::models::submission::{GradeRequest, SubmissionRequest, SubmissionResponse};
use crate::routes::assignment::parse_optional_uuid;
use crate::service::submission::SubmissionService;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, get, post, put};
use rocket_okapi::openapi;
use uuid::Uuid;
use validator::Validate;

/// Submit work for an assignment, replacing an ungraded earlier submission
#[openapi(tag = "Submissions")]
#[post("/", data = "<payload>")]
pub async fn create_submission(
    repo: &State<Repo>,
    current_user: CurrentUser,
    payload: Json<SubmissionRequest>,
) -> Result<Created<Json<SubmissionResponse>>, AppError> {
    payload.validate()?;

    let service = SubmissionService::new(repo.inner().as_ref());
    let submission = service.submit(&current_user, &payload).await?;
    Ok(Created::new(format!("/submissions/{}", submission.id)).body(Json(SubmissionResponse::from(&submission))))
}

/// List submissions visible to the caller, optionally for one assignment
#[openapi(tag = "Submissions")]
#[get("/?<assignment_id>")]
pub async fn list_submissions(
    repo: &State<Repo>,
    current_user: CurrentUser,
    assignment_id: Option<&str>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let assignment_id = parse_optional_uuid(assignment_id)?;
    let submissions = repo.list_submissions(&current_user.scope(), assignment_id).await?;
    Ok(Json(submissions.iter().map(SubmissionResponse::from).collect()))
}

#[openapi(tag = "Submissions")]
#[get("/<id>")]
pub async fn get_submission(repo: &State<Repo>, current_user: CurrentUser, id: &str) -> Result<Json<SubmissionResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = SubmissionService::new(repo.inner().as_ref());
    let submission = service.visible_submission(&current_user, &uuid).await?;
    Ok(Json(SubmissionResponse::from(&submission)))
}

/// Grade a submission in a course the caller teaches
#[openapi(tag = "Submissions")]
#[put("/<id>/grade", data = "<payload>")]
pub async fn grade_submission(
    repo: &State<Repo>,
    current_user: CurrentUser,
    id: &str,
    payload: Json<GradeRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;
    payload.validate()?;

    let service = SubmissionService::new(repo.inner().as_ref());
    let submission = service.grade(&current_user, &uuid, &payload).await?;
    Ok(Json(SubmissionResponse::from(&submission)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_submission, list_submissions, get_submission, grade_submission]
}
