mod school_user_service;

pub use school_user_service::SchoolUserService;
