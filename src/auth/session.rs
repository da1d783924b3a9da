use crate::auth::token::TokenCodec;
use crate::database::user::UserRepository;
use crate::error::app_error::AppError;
use crate::models::user::Identity;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Tolerated clock drift for tokens stamped slightly in the future.
const MAX_CLOCK_SKEW_MS: i64 = 60_000;

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// Issues session tokens and turns bearer headers back into live identities.
///
/// Stateless: nothing is persisted per session and nothing is cached between calls,
/// so a token stays usable for its whole lifetime as long as its identity exists.
pub struct SessionManager {
    codec: TokenCodec,
    ttl: Duration,
}

impl SessionManager {
    /// `ttl_hours` is expected in the range `Config::load` enforces.
    pub fn new(codec: TokenCodec, ttl_hours: i64) -> Self {
        Self {
            codec,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity_id: &Uuid, now: DateTime<Utc>) -> Result<IssuedSession, AppError> {
        let token = self.codec.encode(identity_id, now.timestamp_millis())?;
        Ok(IssuedSession {
            token,
            expires: now + self.ttl,
        })
    }

    /// Header → token → (id, issued_at) → freshness → identity lookup.
    pub async fn resolve<R>(&self, header: Option<&str>, repo: &R, now: DateTime<Utc>) -> Result<Identity, AppError>
    where
        R: UserRepository + ?Sized,
    {
        let token = extract_bearer(header)?;
        let (identity_id, issued_at_ms) = self.codec.decode(token)?;
        self.check_freshness(issued_at_ms, now)?;

        repo.get_identity_by_id(&identity_id).await?.ok_or(AppError::UnknownIdentity)
    }

    pub fn check_freshness(&self, issued_at_ms: i64, now: DateTime<Utc>) -> Result<(), AppError> {
        let age_ms = now.timestamp_millis() - issued_at_ms;
        if age_ms < -MAX_CLOCK_SKEW_MS {
            return Err(AppError::MalformedToken);
        }
        if age_ms > self.ttl.num_milliseconds() {
            return Err(AppError::ExpiredToken);
        }
        Ok(())
    }
}

pub fn extract_bearer(header: Option<&str>) -> Result<&str, AppError> {
    let token = header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or(AppError::MissingToken)?;

    if token.is_empty() {
        return Err(AppError::MissingToken);
    }
    Ok(token)
}
