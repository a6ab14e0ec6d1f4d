mod submission;

pub use submission::{Submission, SubmissionStatus};
