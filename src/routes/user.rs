use crate::auth::CurrentUser;
use crate::auth::role::RoleAuthorizer;
use crate::database::postgres_repository::Repo;
use crate::error::app_error::AppError;
use crate::models::user::{PasswordChangeRequest, ProfileUpdateRequest, UserResponse};
use crate::service::user::UserService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, get, put};
use rocket_okapi::openapi;
use validator::Validate;

/// Current user's profile, with the effective role
#[openapi(tag = "Users")]
#[get("/me")]
pub async fn get_me(repo: &State<Repo>, authorizer: &State<RoleAuthorizer>, current_user: CurrentUser) -> Result<Json<UserResponse>, AppError> {
    let service = UserService::new(repo.inner().as_ref(), authorizer);
    Ok(Json(service.me(&current_user).await?))
}

/// Update the current user's profile
#[openapi(tag = "Users")]
#[put("/me", data = "<payload>")]
pub async fn put_me(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    payload: Json<ProfileUpdateRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let service = UserService::new(repo.inner().as_ref(), authorizer);
    Ok(Json(service.update_me(&current_user, &payload).await?))
}

/// Change the current user's password
#[openapi(tag = "Users")]
#[put("/me/password", data = "<payload>")]
pub async fn put_my_password(
    repo: &State<Repo>,
    authorizer: &State<RoleAuthorizer>,
    current_user: CurrentUser,
    payload: Json<PasswordChangeRequest>,
) -> Result<Status, AppError> {
    payload.validate()?;

    let service = UserService::new(repo.inner().as_ref(), authorizer);
    service.change_password(&current_user, &payload).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_me, put_me, put_my_password]
}
