//! Field-level validation errors shared by the model types.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a model value cannot be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Person name is empty or whitespace.
    EmptyName,
    /// Account username is empty.
    EmptyUsername,
    /// A text field exceeds its column limit.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "`{field}` has {actual_chars} characters; at most {max_chars} allowed"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_len(
    field: &'static str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}
