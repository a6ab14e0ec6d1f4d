mod transparency_dto;

pub use transparency_dto::*;
