mod school_user_handler;

pub use school_user_handler::*;
