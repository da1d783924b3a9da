pub mod password;
pub mod role;
pub mod session;
pub mod token;

use crate::auth::role::{Role, RoleAuthorizer, ensure_role};
use crate::auth::session::SessionManager;
use crate::database::postgres_repository::Repo;
use crate::error::app_error::{AppError, ErrorBody};
use crate::models::scope::Scope;
use crate::models::user::Identity;
use chrono::Utc;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{Object, Responses, SecurityRequirement, SecurityScheme, SecuritySchemeData};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

/// The authenticated caller, with its effective role already resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Why the `CurrentUser` guard refused a request. Kept in request-local cache so the
/// 401 catcher can render the same JSON body a handler error would.
#[derive(Debug, Clone)]
pub struct AuthRejection(pub ErrorBody);

impl CurrentUser {
    pub fn new(identity: &Identity, role: Role) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            full_name: identity.full_name.clone(),
            role,
        }
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        ensure_role(self.role, allowed)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn scope(&self) -> Scope {
        match self.role {
            Role::Admin => Scope::All,
            Role::Instructor => Scope::Instructor(self.id),
            Role::Student => Scope::Student(self.id),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let rocket = req.rocket();
        let (Some(sessions), Some(authorizer), Some(repo)) = (rocket.state::<SessionManager>(), rocket.state::<RoleAuthorizer>(), rocket.state::<Repo>()) else {
            error!("authentication state is not managed");
            return Outcome::Error((Status::InternalServerError, AppError::Internal("Authentication state is not managed".to_string())));
        };

        let header = req.headers().get_one("Authorization");
        match sessions.resolve(header, repo.as_ref(), Utc::now()).await {
            Ok(identity) => {
                let current_user = CurrentUser::new(&identity, authorizer.effective_role(&identity));
                req.local_cache(|| Some(current_user.clone()));
                Outcome::Success(current_user)
            }
            Err(err) => {
                if err.is_authentication_failure() {
                    warn!(code = err.code(), method = %req.method(), uri = %req.uri(), "authentication failed");
                } else {
                    error!(error = ?err, method = %req.method(), uri = %req.uri(), "session resolution failed");
                }
                let status = Status::from(&err);
                req.local_cache(|| Some(AuthRejection(err.body())));
                Outcome::Error((status, err))
            }
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for CurrentUser {
    fn from_request_input(_gen: &mut OpenApiGenerator, _name: String, _required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        let security_scheme = SecurityScheme {
            description: Some("Bearer token. Sign in via POST /auth/signin to obtain one.".to_string()),
            data: SecuritySchemeData::Http {
                scheme: "bearer".to_string(),
                bearer_format: Some("opaque".to_string()),
            },
            extensions: Object::default(),
        };

        let mut security_req = SecurityRequirement::new();
        security_req.insert("bearerAuth".to_string(), Vec::new());

        Ok(RequestHeaderInput::Security("bearerAuth".to_string(), security_scheme, security_req))
    }

    fn get_responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response};
        let mut responses = Responses::default();
        responses.responses.insert(
            "401".to_string(),
            RefOr::Object(Response {
                description: "Unauthorized - missing, malformed or expired bearer token".to_string(),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}
