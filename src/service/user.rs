use crate::auth::CurrentUser;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::role::{Role, RoleAuthorizer};
use crate::database::postgres_repository::Repository;
use crate::error::app_error::AppError;
use crate::models::user::{Identity, PasswordChangeRequest, ProfileUpdateRequest, UserResponse};
use tracing::info;
use uuid::Uuid;

pub struct UserService<'a> {
    repository: &'a dyn Repository,
    authorizer: &'a RoleAuthorizer,
}

impl<'a> UserService<'a> {
    pub fn new(repository: &'a dyn Repository, authorizer: &'a RoleAuthorizer) -> Self {
        UserService { repository, authorizer }
    }

    fn response(&self, identity: &Identity) -> UserResponse {
        UserResponse::new(identity, self.authorizer.effective_role(identity))
    }

    async fn require_identity(&self, id: &Uuid) -> Result<Identity, AppError> {
        self.repository
            .get_identity_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn me(&self, current_user: &CurrentUser) -> Result<UserResponse, AppError> {
        let identity = self.require_identity(&current_user.id).await?;
        Ok(self.response(&identity))
    }

    pub async fn update_me(&self, current_user: &CurrentUser, request: &ProfileUpdateRequest) -> Result<UserResponse, AppError> {
        let identity = self.repository.update_profile(&current_user.id, &trimmed(request)).await?;
        Ok(self.response(&identity))
    }

    pub async fn change_password(&self, current_user: &CurrentUser, request: &PasswordChangeRequest) -> Result<(), AppError> {
        let identity = self.require_identity(&current_user.id).await?;
        verify_password(&identity.password_hash, &request.current_password)?;
        if request.current_password == request.new_password {
            return Err(AppError::BadRequest("New password must differ from the current one".to_string()));
        }

        self.repository.update_password_hash(&identity.id, &hash_password(&request.new_password)?).await?;
        info!(user_id = %identity.id, "password changed");
        Ok(())
    }

    /// Filters on the effective role, the same role every response reports.
    pub async fn list(&self, role: Option<Role>) -> Result<Vec<UserResponse>, AppError> {
        let identities = self.repository.list_identities().await?;
        Ok(identities
            .iter()
            .filter(|identity| role.is_none_or(|role| self.authorizer.effective_role(identity) == role))
            .map(|identity| self.response(identity))
            .collect())
    }

    pub async fn get(&self, id: &Uuid) -> Result<UserResponse, AppError> {
        let identity = self.require_identity(id).await?;
        Ok(self.response(&identity))
    }

    pub async fn admin_update_profile(&self, id: &Uuid, request: &ProfileUpdateRequest) -> Result<UserResponse, AppError> {
        let identity = self.require_identity(id).await?;
        if self.authorizer.is_configured_admin(&identity.email) {
            return Err(AppError::BadRequest("The administrator account cannot be modified".to_string()));
        }

        let identity = self.repository.update_profile(id, &trimmed(request)).await?;
        Ok(self.response(&identity))
    }

    /// Role changes may only move identities between student and instructor.
    pub async fn update_role(&self, actor: &CurrentUser, id: &Uuid, role: Role) -> Result<UserResponse, AppError> {
        if role == Role::Admin {
            return Err(AppError::BadRequest("The admin role cannot be granted".to_string()));
        }

        let identity = self.require_identity(id).await?;
        if self.authorizer.is_configured_admin(&identity.email) {
            return Err(AppError::BadRequest("The administrator account cannot be modified".to_string()));
        }

        let identity = self.repository.update_role(id, role).await?;
        info!(actor_id = %actor.id, user_id = %identity.id, role = %role, "user role updated");
        Ok(self.response(&identity))
    }
}

fn trimmed(request: &ProfileUpdateRequest) -> ProfileUpdateRequest {
    let mut request = request.clone();
    request.full_name = request.full_name.trim().to_string();
    request.student_id = request.student_id.take().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::user::UserRepository;
    use crate::test_utils::{MemoryRepository, STRONG_PASSWORD};

    const ADMIN: &str = "dean@campus.test";

    fn admin_actor(admin: &Identity) -> CurrentUser {
        CurrentUser::new(admin, Role::Admin)
    }

    #[tokio::test]
    async fn granting_admin_is_rejected() {
        let repo = MemoryRepository::new();
        let authorizer = RoleAuthorizer::new(ADMIN);
        let admin = repo.seed_identity(ADMIN, Role::Admin, STRONG_PASSWORD).await;
        let student = repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let service = UserService::new(&repo, &authorizer);

        let result = service.update_role(&admin_actor(&admin), &student.id, Role::Admin).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn configured_admin_cannot_be_demoted_or_edited() {
        let repo = MemoryRepository::new();
        let authorizer = RoleAuthorizer::new(ADMIN);
        let admin = repo.seed_identity(ADMIN, Role::Admin, STRONG_PASSWORD).await;
        let service = UserService::new(&repo, &authorizer);

        let demote = service.update_role(&admin_actor(&admin), &admin.id, Role::Student).await;
        assert!(matches!(demote, Err(AppError::BadRequest(_))));

        let edit = service
            .admin_update_profile(
                &admin.id,
                &ProfileUpdateRequest {
                    full_name: "Someone Else".to_string(),
                    student_id: None,
                    department_id: None,
                },
            )
            .await;
        assert!(matches!(edit, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn promoting_to_instructor_changes_effective_role() {
        let repo = MemoryRepository::new();
        let authorizer = RoleAuthorizer::new(ADMIN);
        let admin = repo.seed_identity(ADMIN, Role::Admin, STRONG_PASSWORD).await;
        let student = repo.seed_identity("prof@campus.test", Role::Student, STRONG_PASSWORD).await;
        let service = UserService::new(&repo, &authorizer);

        let updated = service.update_role(&admin_actor(&admin), &student.id, Role::Instructor).await.unwrap();
        assert_eq!(updated.role, Role::Instructor);
    }

    #[tokio::test]
    async fn password_change_requires_current_password() {
        let repo = MemoryRepository::new();
        let authorizer = RoleAuthorizer::new(ADMIN);
        let identity = repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let me = CurrentUser::new(&identity, Role::Student);
        let service = UserService::new(&repo, &authorizer);

        let wrong = service
            .change_password(
                &me,
                &PasswordChangeRequest {
                    current_password: "not-it".to_string(),
                    new_password: "another-Long-passphrase-42".to_string(),
                },
            )
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        service
            .change_password(
                &me,
                &PasswordChangeRequest {
                    current_password: STRONG_PASSWORD.to_string(),
                    new_password: "another-Long-passphrase-42".to_string(),
                },
            )
            .await
            .unwrap();

        let stored = repo.get_identity_by_id(&identity.id).await.unwrap().unwrap();
        assert!(verify_password(&stored.password_hash, "another-Long-passphrase-42").is_ok());
    }

    #[tokio::test]
    async fn profile_update_trims_fields() {
        let repo = MemoryRepository::new();
        let authorizer = RoleAuthorizer::new(ADMIN);
        let identity = repo.seed_identity("kid@campus.test", Role::Student, STRONG_PASSWORD).await;
        let me = CurrentUser::new(&identity, Role::Student);
        let service = UserService::new(&repo, &authorizer);

        let updated = service
            .update_me(
                &me,
                &ProfileUpdateRequest {
                    full_name: "  Kid Curie ".to_string(),
                    student_id: Some("   ".to_string()),
                    department_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Kid Curie");
        assert_eq!(updated.student_id, None);
    }
}
