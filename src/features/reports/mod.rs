//! Report templates, their dated schedules, and assignment to schools.
//!
//! Assigning a report to schools creates one `incompleted` submission per
//! (schedule, school) pair.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
