use crate::error::ApiError;

/// Required text field: rejects missing, null and blank values.
pub fn require_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

pub fn require_value<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| missing(field))
}

/// Optional text field; blank strings are stored as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// Column widths from migrations/0001_init.sql
pub const CODE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const JUSTIFICATION_MAX_LEN: usize = 500;
pub const COLOR_MAX_LEN: usize = 50;
pub const SIZE_MAX_LEN: usize = 50;
pub const LOCATION_MAX_LEN: usize = 100;
pub const USERNAME_MAX_LEN: usize = 50;

/// Largest value `NUMERIC(10, 2)` holds after rounding.
pub const MAX_WEIGHT: f64 = 99_999_999.99;

/// Rejects text longer than `max` characters (VARCHAR counts characters).
pub fn max_length(value: String, field: &str, max: usize) -> Result<String, ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::Validation(format!(
            "Field '{}' must be at most {} characters",
            field, max
        )));
    }
    Ok(value)
}

pub fn optional_max_length(
    value: Option<String>,
    field: &str,
    max: usize,
) -> Result<Option<String>, ApiError> {
    value.map(|v| max_length(v, field, max)).transpose()
}

pub fn validate_weight(weight: f64) -> Result<f64, ApiError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ApiError::Validation(
            "Field 'peso' must be a non-negative number".to_string(),
        ));
    }
    if weight > MAX_WEIGHT {
        return Err(ApiError::Validation(format!(
            "Field 'peso' must not exceed {}",
            MAX_WEIGHT
        )));
    }
    Ok(weight)
}

fn missing(field: &str) -> ApiError {
    ApiError::Validation(format!("Field '{}' is required", field))
}
