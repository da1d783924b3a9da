use crate::error::app_error::AppError;
use crate::models::user::Identity;
use rocket::FromFormField;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash, JsonSchema, FromFormField)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[field(value = "student")]
    Student,
    #[field(value = "instructor")]
    Instructor,
    #[field(value = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// Stored roles outside the closed set load as unset.
    pub fn from_db<T: AsRef<str>>(value: Option<T>) -> Option<Role> {
        match value.map(|v| v.as_ref().trim().to_ascii_lowercase()).as_deref() {
            Some("student") => Some(Role::Student),
            Some("instructor") => Some(Role::Instructor),
            Some("admin") => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which role an identity acts with.
///
/// This is the single place that knows about the configured admin email and the
/// default applied to identities without a usable stored role.
#[derive(Debug, Clone)]
pub struct RoleAuthorizer {
    admin_email: String,
}

impl RoleAuthorizer {
    pub fn new(admin_email: &str) -> Self {
        Self {
            admin_email: admin_email.trim().to_ascii_lowercase(),
        }
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    pub fn is_configured_admin(&self, email: &str) -> bool {
        !self.admin_email.is_empty() && email.trim().eq_ignore_ascii_case(&self.admin_email)
    }

    pub fn effective_role(&self, identity: &Identity) -> Role {
        if self.is_configured_admin(&identity.email) {
            return Role::Admin;
        }
        identity.role.unwrap_or(Role::Student)
    }

    pub fn require_role(&self, identity: &Identity, allowed: &[Role]) -> Result<Role, AppError> {
        let role = self.effective_role(identity);
        ensure_role(role, allowed)?;
        Ok(role)
    }
}

pub(crate) fn ensure_role(role: Role, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&role) { Ok(()) } else { Err(AppError::Forbidden) }
}
