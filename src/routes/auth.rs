use crate::auth::role::RoleAuthorizer;
use crate::auth::session::SessionManager;
use crate::database::postgres_repository::Repo;
use crate::error::app_error::AppError;
use crate::models::user::{SignInRequest, SignInResponse, SignUpRequest, UserResponse};
use crate::service::auth::AuthService;
use chrono::Utc;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::{State, post};
use rocket_okapi::openapi;
use validator::Validate;

/// Register a new student account
#[openapi(tag = "Authentication")]
#[post("/signup", data = "<payload>")]
pub async fn sign_up(
    repo: &State<Repo>,
    sessions: &State<SessionManager>,
    authorizer: &State<RoleAuthorizer>,
    payload: Json<SignUpRequest>,
) -> Result<Created<Json<UserResponse>>, AppError> {
    payload.validate()?;

    let service = AuthService::new(repo.inner().as_ref(), sessions, authorizer);
    let user = service.sign_up(&payload).await?;
    Ok(Created::new(format!("/users/{}", user.id)).body(Json(user)))
}

/// Exchange email and password for a bearer token
#[openapi(tag = "Authentication")]
#[post("/signin", data = "<payload>")]
pub async fn sign_in(
    repo: &State<Repo>,
    sessions: &State<SessionManager>,
    authorizer: &State<RoleAuthorizer>,
    payload: Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    payload.validate()?;

    let service = AuthService::new(repo.inner().as_ref(), sessions, authorizer);
    Ok(Json(service.sign_in(&payload, Utc::now()).await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![sign_up, sign_in]
}
