mod submission_service;

pub use submission_service::{SubmissionListFilter, SubmissionService};
