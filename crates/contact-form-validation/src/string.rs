//! String validation functions
//!
//! Lengths are counted in characters so that "Zoë" is three long.

use alloc::format;
use alloc::string::String;

/// True when the value is empty or whitespace only
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Validates string length
pub fn validate_min_length(s: &str, min: usize) -> Result<(), String> {
    if char_len(s) >= min {
        Ok(())
    } else {
        Err(format!("Must be at least {} characters", min))
    }
}

pub fn validate_max_length(s: &str, max: usize) -> Result<(), String> {
    if char_len(s) <= max {
        Ok(())
    } else {
        Err(format!("Must be at most {} characters", max))
    }
}

pub fn validate_length(s: &str, min: usize, max: usize) -> Result<(), String> {
    let len = char_len(s);
    if len >= min && len <= max {
        Ok(())
    } else {
        Err(format!("Must be between {} and {} characters", min, max))
    }
}
