pub mod assignment;
pub mod course;
pub mod department;
pub mod health;
pub mod scope;
pub mod submission;
pub mod user;
