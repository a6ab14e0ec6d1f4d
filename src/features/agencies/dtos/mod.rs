mod agency_dto;

pub use agency_dto::{AgencyResponseDto, CreateAgencyDto, UpdateAgencyDto};
