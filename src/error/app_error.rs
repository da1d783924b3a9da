use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use rocket_okapi::OpenApiError;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::response::OpenApiResponderInner;
use schemars::JsonSchema;
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("Unauthorized")]
    MissingToken,
    #[error("Unauthorized")]
    MalformedToken,
    #[error("Unauthorized")]
    ExpiredToken,
    #[error("Unauthorized")]
    UnknownIdentity,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden")]
    Forbidden,
    #[error("Internal server error")]
    PasswordHash { message: String },
    #[error("Internal server error")]
    Token { message: String },
    #[error("Internal server error")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Bad request: {message}")]
    UuidError {
        message: String,
        #[source]
        source: uuid::Error,
    },
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Internal server error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

/// JSON body every failed request carries.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn uuid(message: impl Into<String>, source: uuid::Error) -> Self {
        Self::UuidError {
            message: message.into(),
            source,
        }
    }

    pub fn password_hash(message: impl Into<String>, source: password_hash::Error) -> Self {
        Self::PasswordHash {
            message: format!("{}: {}", message.into(), source),
        }
    }

    /// Authentication failures all surface as 401 but keep their kind in `code`.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AppError::MissingToken | AppError::MalformedToken | AppError::ExpiredToken | AppError::UnknownIdentity | AppError::InvalidCredentials
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingToken => "missing_token",
            AppError::MalformedToken => "malformed_token",
            AppError::ExpiredToken => "expired_token",
            AppError::UnknownIdentity => "unknown_identity",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Forbidden => "forbidden",
            AppError::BadRequest(_) | AppError::UuidError { .. } => "bad_request",
            AppError::ValidationError(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Db { .. } | AppError::PasswordHash { .. } | AppError::Token { .. } | AppError::Internal(_) | AppError::ConfigurationError { .. } => {
                "internal"
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::MissingToken => Some("Missing bearer token".to_string()),
            AppError::MalformedToken => Some("Malformed bearer token".to_string()),
            AppError::ExpiredToken => Some("Session has expired".to_string()),
            AppError::UnknownIdentity => Some("Session does not belong to a known user".to_string()),
            AppError::BadRequest(message) | AppError::NotFound(message) | AppError::Conflict(message) => Some(message.clone()),
            AppError::UuidError { message, .. } => Some(message.clone()),
            AppError::ValidationError(errors) => Some(errors.to_string()),
            _ => None,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let error = match Status::from(self).code {
            401 => "Unauthorized".to_string(),
            403 => "Forbidden".to_string(),
            500 => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        ErrorBody {
            error,
            code: self.code(),
            details: self.details(),
        }
    }
}

impl From<password_hash::Error> for AppError {
    fn from(e: password_hash::Error) -> Self {
        AppError::password_hash("Password hashing failed", e)
    }
}

impl From<uuid::Error> for AppError {
    fn from(e: uuid::Error) -> Self {
        AppError::uuid("Invalid UUID", e)
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::MissingToken
            | AppError::MalformedToken
            | AppError::ExpiredToken
            | AppError::UnknownIdentity
            | AppError::InvalidCredentials => Status::Unauthorized,
            AppError::Forbidden => Status::Forbidden,
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::UuidError { .. } => Status::BadRequest,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::Conflict(_) => Status::Conflict,
            AppError::Db { .. } => Status::InternalServerError,
            AppError::PasswordHash { .. } => Status::InternalServerError,
            AppError::Token { .. } => Status::InternalServerError,
            AppError::Internal(_) => Status::InternalServerError,
            AppError::ConfigurationError { .. } => Status::InternalServerError,
        }
    }
}

pub(crate) fn json_response(status: Status, body: &ErrorBody) -> rocket::response::Result<'static> {
    let payload = serde_json::to_string(body).map_err(|_| Status::InternalServerError)?;
    Response::build()
        .status(status)
        .header(ContentType::JSON)
        .sized_body(payload.len(), Cursor::new(payload))
        .ok()
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        let user_id = req
            .local_cache(|| None::<crate::auth::CurrentUser>)
            .as_ref()
            .map(|u| u.id.to_string())
            .unwrap_or_else(|| "anonymous".to_string());

        let status = Status::from(&self);
        if status.class().is_server_error() {
            error!(
                error = ?self,
                request_id = %request_id,
                user_id = %user_id,
                method = %method,
                uri = %uri,
                "request failed"
            );
        } else {
            warn!(
                error = %self,
                code = self.code(),
                request_id = %request_id,
                user_id = %user_id,
                method = %method,
                uri = %uri,
                "request rejected"
            );
        }

        json_response(status, &self.body())
    }
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
        let mut responses = Responses::default();
        for (code, description) in [
            ("400", "Bad Request"),
            ("401", "Unauthorized"),
            ("403", "Forbidden"),
            ("404", "Not Found"),
            ("409", "Conflict"),
            ("500", "Internal Server Error"),
        ] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                AppError::Conflict("Resource already exists".to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
                AppError::BadRequest("Referenced resource does not exist".to_string())
            }
            _ => AppError::db("Database error", e),
        }
    }
}
