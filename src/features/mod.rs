pub mod agencies;
pub mod auth;
pub mod categories;
pub mod documents;
pub mod exports;
pub mod reports;
pub mod schools;
pub mod submissions;
pub mod transparency;
pub mod users;
