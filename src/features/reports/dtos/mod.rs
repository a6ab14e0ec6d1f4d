mod report_dto;

pub use report_dto::{
    AssignSchoolsDto, AssignSchoolsResponseDto, CreateReportDto, CreateScheduleDto,
    ListReportsQuery, ReportResponseDto, ScheduleResponseDto, UpdateReportDto,
};
