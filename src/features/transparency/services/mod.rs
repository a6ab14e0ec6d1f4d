mod transparency_service;

pub use transparency_service::TransparencyService;
