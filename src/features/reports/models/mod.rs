mod report;
mod report_schedule;

pub use report::{Report, ReportCategoryRow, ReportWithDetails};
pub use report_schedule::{schedule_display_name, ReportSchedule};
