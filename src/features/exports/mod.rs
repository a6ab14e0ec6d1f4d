//! Bulk download of submissions.
//!
//! `POST /api/submissions/export` bundles the selected submissions' files
//! and an XLSX summary sheet into one zip archive.

pub mod bundle;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::ExportService;
