//! School users: agency staff that submissions are assigned to.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/users` | staff | List users of an agency |
//! | GET | `/api/users/{id}` | staff | Get one user |
//! | POST | `/api/users` | agency admin | Create user |
//! | PUT | `/api/users/{id}` | agency admin | Update user |
//! | DELETE | `/api/users/{id}` | agency admin | Delete user |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SchoolUserService;
