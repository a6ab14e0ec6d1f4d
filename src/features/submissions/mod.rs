//! Submissions: one school's instance of one scheduled report.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/submissions` | staff | Paginated flat list |
//! | GET | `/api/submissions/grouped` | staff | Grouped, filtered view |
//! | GET | `/api/submissions/{id}` | staff | Detail with resolved names |
//! | PATCH | `/api/submissions/{id}/assign` | agency admin | Assign a team member |
//! | POST | `/api/submissions/assign` | agency admin | Bulk assign |
//! | PATCH | `/api/submissions/{id}/status` | staff | Review workflow |
//! | POST | `/api/submissions/{id}/files` | staff | Attach a file |
//! | DELETE | `/api/submissions/{id}/files` | staff | Detach a file |

pub mod dtos;
pub mod grouping;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod routes;
pub mod selection;
pub mod services;

pub use services::SubmissionService;
