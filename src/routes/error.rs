use crate::auth::AuthRejection;
use crate::error::app_error::{AppError, ErrorBody};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Request, catch};

fn body(code: &'static str, error: &str) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: error.to_string(),
        code,
        details: None,
    })
}

#[catch(400)]
pub fn bad_request(_: &Request) -> Json<ErrorBody> {
    body("bad_request", "Bad request")
}

/// Renders the rejection the `CurrentUser` guard left behind, if any.
#[catch(401)]
pub fn unauthorized(req: &Request) -> Json<ErrorBody> {
    match req.local_cache(|| None::<AuthRejection>) {
        Some(AuthRejection(rejection)) => Json(rejection.clone()),
        None => Json(AppError::MissingToken.body()),
    }
}

#[catch(403)]
pub fn forbidden(_: &Request) -> Json<ErrorBody> {
    Json(AppError::Forbidden.body())
}

#[catch(404)]
pub fn not_found(_: &Request) -> Json<ErrorBody> {
    body("not_found", "Not found")
}

#[catch(409)]
pub fn conflict(_: &Request) -> Json<ErrorBody> {
    body("conflict", "Conflict")
}

/// Body that failed to deserialize into the request type.
#[catch(422)]
pub fn unprocessable(_: &Request) -> Json<ErrorBody> {
    body("validation", "Validation error")
}

#[catch(500)]
pub fn internal(_: &Request) -> Json<ErrorBody> {
    body("internal", "Internal server error")
}

#[catch(default)]
pub fn default(status: Status, _: &Request) -> Json<ErrorBody> {
    let code = if status.class().is_server_error() { "internal" } else { "bad_request" };
    body(code, status.reason_lossy())
}
