use crate::auth::CurrentUser;
use crate::auth::role::Role;
use crate::database::postgres_repository::Repository;
use crate::error::app_error::AppError;
use crate::models::scope::Scope;
use crate::models::submission::{GradeRequest, Submission, SubmissionRequest};
use tracing::info;
use uuid::Uuid;

pub struct SubmissionService<'a> {
    repository: &'a dyn Repository,
}

impl<'a> SubmissionService<'a> {
    pub fn new(repository: &'a dyn Repository) -> Self {
        SubmissionService { repository }
    }

    pub async fn visible_submission(&self, current_user: &CurrentUser, id: &Uuid) -> Result<Submission, AppError> {
        self.repository
            .get_submission(id, &current_user.scope())
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))
    }

    /// Students submit once per assignment and may resubmit until graded.
    pub async fn submit(&self, current_user: &CurrentUser, request: &SubmissionRequest) -> Result<Submission, AppError> {
        current_user.require_role(&[Role::Student])?;

        let assignment = self
            .repository
            .get_assignment(&request.assignment_id, &Scope::All)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
        if !self.repository.is_enrolled(&assignment.course_id, &current_user.id).await? {
            return Err(AppError::Forbidden);
        }

        if let Some(existing) = self.repository.get_submission_for(&assignment.id, &current_user.id).await?
            && existing.is_graded()
        {
            return Err(AppError::BadRequest("Submission has already been graded".to_string()));
        }

        let submission = self
            .repository
            .upsert_submission(request, &current_user.id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Submission has already been graded".to_string()))?;

        info!(submission_id = %submission.id, assignment_id = %assignment.id, student_id = %current_user.id, "submission stored");
        Ok(submission)
    }

    pub async fn grade(&self, current_user: &CurrentUser, id: &Uuid, request: &GradeRequest) -> Result<Submission, AppError> {
        current_user.require_role(&[Role::Instructor, Role::Admin])?;

        let submission = self.visible_submission(current_user, id).await?;
        let assignment = self
            .repository
            .get_assignment(&submission.assignment_id, &Scope::All)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if request.grade < 0 || request.grade > assignment.max_points {
            return Err(AppError::BadRequest(format!("Grade must be between 0 and {}", assignment.max_points)));
        }

        let graded = self.repository.grade_submission(id, request.grade, request.feedback.as_deref()).await?;
        info!(submission_id = %graded.id, grade = request.grade, actor_id = %current_user.id, "submission graded");
        Ok(graded)
    }
}
