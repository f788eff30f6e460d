//! Resource-id validation.
//!
//! The server rejects malformed ids with an opaque 500, so ids are checked
//! locally before any create call.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref RESOURCE_ID: Regex =
        Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").expect("static regex must compile");
}

/// Error for ids the API would reject.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdError {
    #[error(
        "invalid resource id {0:?}: ids are 1-64 chars of lowercase letters, \
         digits, '-' or '_', starting with a letter or digit"
    )]
    Invalid(String),
}

/// Validate a judge or router id chosen by the caller.
pub fn validate_resource_id(id: &str) -> Result<(), IdError> {
    if RESOURCE_ID.is_match(id) {
        Ok(())
    } else {
        Err(IdError::Invalid(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        for id in ["a", "my-judge", "router_2", "0abc", "x".repeat(64).as_str()] {
            assert!(validate_resource_id(id).is_ok(), "expected {id:?} to be valid");
        }
    }

    #[test]
    fn test_invalid_ids() {
        for id in ["", "-leading-dash", "UpperCase", "has space", "x".repeat(65).as_str()] {
            assert!(validate_resource_id(id).is_err(), "expected {id:?} to be invalid");
        }
    }
}
