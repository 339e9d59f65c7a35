//! Error type for field construction and lifecycle.

use std::fmt;

use crate::host::SurfaceError;
use crate::lifecycle::FieldState;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A configuration value is out of range.
    InvalidConfig(String),

    /// The operation is not allowed in the field's current state.
    InvalidState { op: &'static str, state: FieldState },

    /// The surface refused to create a visual handle.
    Attach(SurfaceError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidConfig(msg) => write!(f, "invalid field config: {msg}"),
            FieldError::InvalidState { op, state } => {
                write!(f, "cannot {op} a field in state {state:?}")
            }
            FieldError::Attach(e) => write!(f, "failed to attach sprite: {e}"),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::Attach(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SurfaceError> for FieldError {
    fn from(e: SurfaceError) -> Self {
        FieldError::Attach(e)
    }
}
