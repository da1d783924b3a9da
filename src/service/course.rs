use crate::auth::CurrentUser;
use crate::auth::role::{Role, RoleAuthorizer};
use crate::database::postgres_repository::Repository;
use crate::error::app_error::AppError;
use crate::models::course::{Course, CourseRequest, EnrolledStudent, Enrollment};
use crate::models::scope::Scope;
use tracing::info;
use uuid::Uuid;

const STAFF: &[Role] = &[Role::Instructor, Role::Admin];

pub struct CourseService<'a> {
    repository: &'a dyn Repository,
    authorizer: &'a RoleAuthorizer,
}

impl<'a> CourseService<'a> {
    pub fn new(repository: &'a dyn Repository, authorizer: &'a RoleAuthorizer) -> Self {
        CourseService { repository, authorizer }
    }

    /// A course the caller can see, or 404.
    pub async fn visible_course(&self, current_user: &CurrentUser, id: &Uuid) -> Result<Course, AppError> {
        self.repository
            .get_course(id, &current_user.scope())
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    /// A course the caller may modify: staff only, and instructors only their own.
    pub async fn owned_course(&self, current_user: &CurrentUser, id: &Uuid) -> Result<Course, AppError> {
        current_user.require_role(STAFF)?;
        self.visible_course(current_user, id).await
    }

    pub async fn create(&self, current_user: &CurrentUser, request: &CourseRequest) -> Result<Course, AppError> {
        current_user.require_role(STAFF)?;

        let instructor_id = match current_user.role {
            Role::Admin => self.assignable_instructor(request.instructor_id).await?,
            _ => current_user.id,
        };

        let course = self.repository.create_course(request, &instructor_id).await?;
        info!(course_id = %course.id, instructor_id = %instructor_id, actor_id = %current_user.id, "course created");
        Ok(course)
    }

    async fn assignable_instructor(&self, instructor_id: Option<Uuid>) -> Result<Uuid, AppError> {
        let id = instructor_id.ok_or_else(|| AppError::BadRequest("instructor_id is required".to_string()))?;
        let identity = self
            .repository
            .get_identity_by_id(&id)
            .await?
            .ok_or_else(|| AppError::BadRequest("instructor_id does not name a user".to_string()))?;

        if self.authorizer.effective_role(&identity) != Role::Instructor {
            return Err(AppError::BadRequest("instructor_id does not name an instructor".to_string()));
        }
        Ok(identity.id)
    }

    pub async fn update(&self, current_user: &CurrentUser, id: &Uuid, request: &CourseRequest) -> Result<Course, AppError> {
        self.owned_course(current_user, id).await?;
        self.repository.update_course(id, request).await
    }

    pub async fn delete(&self, current_user: &CurrentUser, id: &Uuid) -> Result<(), AppError> {
        self.owned_course(current_user, id).await?;
        self.repository.delete_course(id).await?;
        info!(course_id = %id, actor_id = %current_user.id, "course deleted");
        Ok(())
    }

    pub async fn roster(&self, current_user: &CurrentUser, id: &Uuid) -> Result<Vec<EnrolledStudent>, AppError> {
        self.owned_course(current_user, id).await?;
        self.repository.list_enrollments(id).await
    }

    pub async fn enroll(&self, current_user: &CurrentUser, id: &Uuid) -> Result<Enrollment, AppError> {
        current_user.require_role(&[Role::Student])?;
        if self.repository.get_course(id, &Scope::All).await?.is_none() {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        let enrollment = self.repository.enroll(id, &current_user.id).await?;
        info!(course_id = %id, student_id = %current_user.id, "student enrolled");
        Ok(enrollment)
    }

    pub async fn unenroll(&self, current_user: &CurrentUser, id: &Uuid) -> Result<(), AppError> {
        current_user.require_role(&[Role::Student])?;
        if !self.repository.unenroll(id, &current_user.id).await? {
            return Err(AppError::NotFound("Not enrolled in this course".to_string()));
        }
        info!(course_id = %id, student_id = %current_user.id, "student unenrolled");
        Ok(())
    }
}
