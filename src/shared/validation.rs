use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::AppError;
use crate::shared::constants::GRADE_LEVELS;

lazy_static! {
    /// Regex for validating code fields (agency slug, etc.)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "springfield-usd", "district12", "a-b-c"
    /// - Invalid: "-org", "org-", "org--name", "Org", "org_name"
    pub static ref CODE_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for category colors: `#RRGGBB`
    pub static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

/// Reject codes that do not match [`CODE_REGEX`]
pub fn ensure_code(field: &str, value: &str) -> Result<(), AppError> {
    if CODE_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be lowercase letters, digits and single hyphens",
            field
        )))
    }
}

/// Reject colors that are not `#RRGGBB`
pub fn ensure_hex_color(value: &str) -> Result<(), AppError> {
    if HEX_COLOR_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "color '{}' must be in #RRGGBB format",
            value
        )))
    }
}

/// Normalize grade labels (trim, uppercase) and reject unknown ones
pub fn normalize_grades(grades: &[String]) -> Result<Vec<String>, AppError> {
    let mut normalized: Vec<String> = Vec::with_capacity(grades.len());
    for grade in grades {
        let g = grade.trim().to_uppercase();
        if !GRADE_LEVELS.contains(&g.as_str()) {
            return Err(AppError::Validation(format!(
                "Unknown grade '{}'. Allowed: {}",
                grade,
                GRADE_LEVELS.join(", ")
            )));
        }
        if !normalized.contains(&g) {
            normalized.push(g);
        }
    }
    Ok(normalized)
}
