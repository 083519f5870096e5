//! Field checks for request payloads, mirroring the column constraints in the
//! schema so bad input is answered with 400 instead of a database error.

/// Request payloads that can be checked before touching the database.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub fn required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} must be at most {} characters", field, max));
    }
    Ok(())
}

/// Required and bounded, for `VARCHAR(n) NOT NULL` columns.
pub fn required_max_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    required(field, value)?;
    max_length(field, value, max)
}

pub fn non_negative(field: &str, value: i32) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{} must not be negative", field));
    }
    Ok(())
}

pub fn at_most(field: &str, value: i32, max: i32) -> Result<(), String> {
    if value > max {
        return Err(format!("{} must be at most {}", field, max));
    }
    Ok(())
}
