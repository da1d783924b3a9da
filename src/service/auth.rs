use crate::auth::password::{dummy_verify, hash_password, verify_password};
use crate::auth::role::{Role, RoleAuthorizer};
use crate::auth::session::SessionManager;
use crate::database::postgres_repository::Repository;
use crate::error::app_error::AppError;
use crate::models::user::{Identity, NewIdentity, SessionResponse, SignInRequest, SignInResponse, SignUpRequest, UserResponse, normalize_email};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub struct AuthService<'a> {
    repository: &'a dyn Repository,
    sessions: &'a SessionManager,
    authorizer: &'a RoleAuthorizer,
}

impl<'a> AuthService<'a> {
    pub fn new(repository: &'a dyn Repository, sessions: &'a SessionManager, authorizer: &'a RoleAuthorizer) -> Self {
        AuthService {
            repository,
            sessions,
            authorizer,
        }
    }

    /// Registers a new student. Assumes `request` has already been validated.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<UserResponse, AppError> {
        let email = normalize_email(&request.email);
        if self.authorizer.is_configured_admin(&email) {
            return Err(AppError::BadRequest("This email cannot be used to sign up".to_string()));
        }
        if self.repository.get_identity_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("An account with this email already exists".to_string()));
        }

        let identity = self
            .repository
            .create_identity(&NewIdentity {
                email,
                full_name: request.full_name.trim().to_string(),
                role: Role::Student,
                student_id: request.student_id.clone(),
                department_id: request.department_id,
                password_hash: hash_password(&request.password)?,
            })
            .await?;

        info!(user_id = %identity.id, "user signed up");
        Ok(UserResponse::new(&identity, self.authorizer.effective_role(&identity)))
    }

    pub async fn sign_in(&self, request: &SignInRequest, now: DateTime<Utc>) -> Result<SignInResponse, AppError> {
        let email = normalize_email(&request.email);
        let Some(identity) = self.repository.get_identity_by_email(&email).await? else {
            dummy_verify(&request.password);
            warn!("sign-in attempt for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if let Err(err) = verify_password(&identity.password_hash, &request.password) {
            warn!(user_id = %identity.id, "sign-in attempt with wrong password");
            return Err(err);
        }

        let session = self.sessions.issue(&identity.id, now)?;
        info!(user_id = %identity.id, "user signed in");

        Ok(SignInResponse {
            user: UserResponse::new(&identity, self.authorizer.effective_role(&identity)),
            session: SessionResponse {
                token: session.token,
                expires: session.expires,
            },
        })
    }

    /// Creates the configured admin identity, or resets its password if it already exists.
    pub async fn bootstrap_admin(&self, full_name: &str, password: &str) -> Result<Identity, AppError> {
        let email = self.authorizer.admin_email();
        if email.is_empty() {
            return Err(AppError::BadRequest("No admin email is configured".to_string()));
        }

        let password_hash = hash_password(password)?;
        match self.repository.get_identity_by_email(email).await? {
            Some(existing) => {
                self.repository.update_password_hash(&existing.id, &password_hash).await?;
                let identity = self.repository.update_role(&existing.id, Role::Admin).await?;
                info!(user_id = %identity.id, "admin password reset");
                Ok(identity)
            }
            None => {
                let identity = self
                    .repository
                    .create_identity(&NewIdentity {
                        email: email.to_string(),
                        full_name: full_name.trim().to_string(),
                        role: Role::Admin,
                        student_id: None,
                        department_id: None,
                        password_hash,
                    })
                    .await?;
                info!(user_id = %identity.id, "admin identity created");
                Ok(identity)
            }
        }
    }
}
