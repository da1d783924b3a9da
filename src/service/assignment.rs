use crate::auth::CurrentUser;
use crate::auth::role::Role;
use crate::database::postgres_repository::Repository;
use crate::error::app_error::AppError;
use crate::models::assignment::{Assignment, AssignmentRequest, AssignmentUpdateRequest};
use tracing::info;
use uuid::Uuid;

pub struct AssignmentService<'a> {
    repository: &'a dyn Repository,
}

impl<'a> AssignmentService<'a> {
    pub fn new(repository: &'a dyn Repository) -> Self {
        AssignmentService { repository }
    }

    pub async fn visible_assignment(&self, current_user: &CurrentUser, id: &Uuid) -> Result<Assignment, AppError> {
        self.repository
            .get_assignment(id, &current_user.scope())
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
    }

    pub async fn create(&self, current_user: &CurrentUser, request: &AssignmentRequest) -> Result<Assignment, AppError> {
        current_user.require_role(&[Role::Instructor, Role::Admin])?;
        if self.repository.get_course(&request.course_id, &current_user.scope()).await?.is_none() {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        let assignment = self.repository.create_assignment(request).await?;
        info!(assignment_id = %assignment.id, course_id = %assignment.course_id, actor_id = %current_user.id, "assignment created");
        Ok(assignment)
    }

    pub async fn update(&self, current_user: &CurrentUser, id: &Uuid, request: &AssignmentUpdateRequest) -> Result<Assignment, AppError> {
        current_user.require_role(&[Role::Instructor, Role::Admin])?;
        self.visible_assignment(current_user, id).await?;
        self.repository.update_assignment(id, request).await
    }

    pub async fn delete(&self, current_user: &CurrentUser, id: &Uuid) -> Result<(), AppError> {
        current_user.require_role(&[Role::Instructor, Role::Admin])?;
        self.visible_assignment(current_user, id).await?;
        self.repository.delete_assignment(id).await?;
        info!(assignment_id = %id, actor_id = %current_user.id, "assignment deleted");
        Ok(())
    }
}
