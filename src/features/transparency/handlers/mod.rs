mod transparency_handler;

pub use transparency_handler::*;
