//! Schools owned by an agency. Deletion is soft (`is_active = false`).

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SchoolService;
