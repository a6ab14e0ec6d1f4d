mod grouped_dto;
mod submission_dto;

pub use grouped_dto::{GroupedQuery, GroupedViewDto, SubmissionGroupDto, SubmissionRowDto};
pub use submission_dto::{
    AssignMemberDto, BulkAssignDto, BulkAssignResponseDto, ListSubmissionsQuery,
    RemoveFileDto, SubmissionDetailDto, SubmissionResponseDto, UpdateStatusDto,
};
