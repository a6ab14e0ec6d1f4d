/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Platform operator - manages every agency
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Agency administrator - manages schools, reports and users of one agency
pub const ROLE_AGENCY_ADMIN: &str = "agency_admin";

/// School administrator - works on submissions of their school
pub const ROLE_SCHOOL_ADMIN: &str = "school_admin";

/// Agency staff member that can be assigned to submissions
pub const ROLE_TEAM_MEMBER: &str = "team_member";

// =============================================================================
// GRADES
// =============================================================================

/// Grade levels accepted in a school's `gradeserved` list
pub const GRADE_LEVELS: &[&str] = &[
    "PK", "K", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12",
];
