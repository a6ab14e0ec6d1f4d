mod school_user;

pub use school_user::{SchoolUser, SchoolUserRole};
