//! Agencies: the top-level tenant that owns schools, users and reports.
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/agencies` | super admin | List agencies |
//! | GET | `/api/agencies/{id}` | staff | Get one agency |
//! | POST | `/api/agencies` | super admin | Create agency |
//! | PUT | `/api/agencies/{id}` | super admin | Update agency |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AgencyService;
