mod agency_handler;

pub use agency_handler::*;
