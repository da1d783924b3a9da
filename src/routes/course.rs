use crate::auth::CurrentUser;
use crate::auth::role::RoleAuthorizer;
use crate::database::postgres_repository::Repo;
use crate::error::app_error::AppError;
use crate::models::course::{CourseRequest, CourseResponse, EnrolledStudent, EnrollmentResponse};
use crate::service::course::CourseService;
use rocket::http::Status;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_okapi::openapi;
use uuid::Uuid;
use validator::Validate;

/// Create a course
#[openapi(tag = "Courses")]
#[post("/", data = "<payload>")]
pub async fn create_course(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    payload: Json<CourseRequest>,
) -> Result<Created<Json<CourseResponse>>, AppError> {
    payload.validate()?;

    let service = CourseService::new(repo.inner().as_ref(), authorizer);
    let course = service.create(&current_user, &payload).await?;
    Ok(Created::new(format!("/courses/{}", course.id)).body(Json(CourseResponse::from(&course))))
}

/// List the courses visible to the caller
#[openapi(tag = "Courses")]
#[get("/")]
pub async fn list_courses(repo: &State<Repo>, current_user: CurrentUser) -> Result<Json<Vec<CourseResponse>>, AppError> {
    let courses = repo.list_courses(&current_user.scope()).await?;
    Ok(Json(courses.iter().map(CourseResponse::from).collect()))
}

/// Get a course by id
#[openapi(tag = "Courses")]
#[get("/<id>")]
pub async fn get_course(repo: &State<Repo>, authorizer: &State<RoleAuthorizer>, current_user: CurrentUser, id: &str) -> Result<Json<CourseResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = CourseService::new(repo.inner().as_ref(), authorizer);
    let course = service.visible_course(&current_user, &uuid).await?;
    Ok(Json(CourseResponse::from(&course)))
}

/// Update a course
#[openapi(tag = "Courses")]
#[put("/<id>", data = "<payload>")]
pub async fn put_course(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    id: &str,
    payload: Json<CourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;
    payload.validate()?;

    let service = CourseService::new(repo.inner().as_ref(), authorizer);
    let course = service.update(&current_user, &uuid, &payload).await?;
    Ok(Json(CourseResponse::from(&course)))
}

/// Delete a course with its assignments and submissions
#[openapi(tag = "Courses")]
#[delete("/<id>")]
pub async fn delete_course(repo: &State<Repo>, authorizer: &State<RoleAuthorizer>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = CourseService::new(repo.inner().as_ref(), authorizer);
    service.delete(&current_user, &uuid).await?;
    Ok(Status::NoContent)
}

/// Students enrolled in a course
#[openapi(tag = "Enrollments")]
#[get("/<id>/enrollments")]
pub async fn list_enrollments(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    id: &str,
) -> Result<Json<Vec<EnrolledStudent>>, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = CourseService::new(repo.inner().as_ref(), authorizer);
    Ok(Json(service.roster(&current_user, &uuid).await?))
}

/// Enroll the calling student in a course
#[openapi(tag = "Enrollments")]
#[post("/<id>/enrollments")]
pub async fn enroll(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    id: &str,
) -> Result<Created<Json<EnrollmentResponse>>, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = CourseService::new(repo.inner().as_ref(), authorizer);
    let enrollment = service.enroll(&current_user, &uuid).await?;
    Ok(Created::new(format!("/courses/{}/enrollments", uuid)).body(Json(EnrollmentResponse::from(&enrollment))))
}

/// Withdraw the calling student from a course
#[openapi(tag = "Enrollments")]
#[delete("/<id>/enrollments")]
pub async fn unenroll(repo: &State<Repo>, authorizer: &State<RoleAuthorizer>, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let uuid = Uuid::parse_str(id)?;

    let service = CourseService::new(repo.inner().as_ref(), authorizer);
    service.unenroll(&current_user, &uuid).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_course, list_courses, get_course, put_course, delete_course, list_enrollments, enroll, unenroll]
}
