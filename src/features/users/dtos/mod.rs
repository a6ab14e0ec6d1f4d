mod school_user_dto;

pub use school_user_dto::{
    CreateSchoolUserDto, ListSchoolUsersQuery, SchoolUserResponseDto, UpdateSchoolUserDto,
};
