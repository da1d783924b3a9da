pub mod assignment;
pub mod course;
pub mod department;
pub mod postgres_repository;
pub mod submission;
pub mod user;
