//! Public transparency pages.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/transparency/schools/{id}` | School profile and published documents by category |
//! | GET | `/api/transparency/details/{id}` | One published document with a presigned download URL |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::TransparencyService;
