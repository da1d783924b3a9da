use crate::database::assignment::AssignmentRepository;
use crate::database::course::CourseRepository;
use crate::database::department::DepartmentRepository;
use crate::database::submission::SubmissionRepository;
use crate::database::user::UserRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}

/// Every store the handlers talk to, behind one object so tests can swap the backend.
pub trait Repository: UserRepository + DepartmentRepository + CourseRepository + AssignmentRepository + SubmissionRepository + Send + Sync {}

impl<T> Repository for T where T: UserRepository + DepartmentRepository + CourseRepository + AssignmentRepository + SubmissionRepository + Send + Sync {}

/// Managed Rocket state holding the active repository.
pub type Repo = Arc<dyn Repository>;
