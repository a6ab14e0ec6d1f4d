//! Transparency documents uploaded by schools.
//!
//! Published documents live under the public storage prefix and show up on
//! the school's transparency page; drafts stay private.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::DocumentService;
