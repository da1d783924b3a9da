use crate::Config;
use crate::auth::role::RoleAuthorizer;
use crate::auth::session::SessionManager;
use crate::auth::token::TokenCodec;
use crate::database::postgres_repository::PostgresRepository;
use crate::db::{init_pool, run_migrations};
use crate::models::user::validate_password_strength;
use crate::service::auth::AuthService;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct BootstrapAdminResult {
    pub user_id: Uuid,
    pub email: String,
}

/// Creates the configured admin identity, or resets its password if it already exists.
pub async fn bootstrap_admin(config: &Config, full_name: &str, password: &str) -> Result<BootstrapAdminResult, String> {
    if full_name.trim().is_empty() {
        return Err("ADMIN_FULL_NAME must not be empty".to_string());
    }
    validate_password_strength(password).map_err(|_| "ADMIN_PASSWORD is too easy to guess".to_string())?;

    let pool = init_pool(&config.database)
        .await
        .map_err(|err| format!("Failed to initialize database pool: {err}"))?;
    run_migrations(&pool)
        .await
        .map_err(|err| format!("Failed to run database migrations: {err}"))?;

    let repo = PostgresRepository { pool: pool.clone() };
    // Only the credential store is touched; the codec never issues a token here.
    let sessions = SessionManager::new(TokenCodec::ephemeral(), config.auth.token_ttl_hours);
    let authorizer = RoleAuthorizer::new(&config.auth.admin_email);
    let identity = AuthService::new(&repo, &sessions, &authorizer)
        .bootstrap_admin(full_name, password)
        .await
        .map_err(|err| format!("Failed to bootstrap admin: {err:?}"))?;

    pool.close().await;

    Ok(BootstrapAdminResult {
        user_id: identity.id,
        email: identity.email,
    })
}
