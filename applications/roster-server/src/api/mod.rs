/// API route modules
pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod feedback;
pub mod health;
pub mod me;
pub mod transfer;
pub mod users;
