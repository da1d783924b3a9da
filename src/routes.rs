pub mod admin;
pub mod assignment;
pub mod auth;
pub mod course;
pub mod department;
pub mod error;
pub mod health;
pub mod submission;
pub mod user;
