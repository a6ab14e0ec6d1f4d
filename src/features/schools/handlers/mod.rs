mod school_handler;

pub use school_handler::*;
