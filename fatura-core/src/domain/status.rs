//! Document lifecycle vocabulary shared with the Authority.
//!
//! The wire protocol exchanges single-letter outcome codes; unknown letters
//! mean "no status yet" rather than an error.

use crate::foundation::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    Pending,
    Validated,
    Invalidated,
    Rejected,
    Error,
}

impl ValidationStatus {
    pub fn as_code(&self) -> char {
        match self {
            ValidationStatus::Pending => 'P',
            ValidationStatus::Validated => 'V',
            ValidationStatus::Invalidated => 'I',
            ValidationStatus::Rejected => 'R',
            ValidationStatus::Error => 'E',
        }
    }

    /// Unknown codes are "no status", not an error.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'P' => Some(ValidationStatus::Pending),
            'V' => Some(ValidationStatus::Validated),
            'I' => Some(ValidationStatus::Invalidated),
            'R' => Some(ValidationStatus::Rejected),
            'E' => Some(ValidationStatus::Error),
            _ => None,
        }
    }

    pub fn from_code_str(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(first), None) => Self::from_code(first),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationStatus::Pending => "Pending",
            ValidationStatus::Validated => "Validated",
            ValidationStatus::Invalidated => "Invalidated",
            ValidationStatus::Rejected => "Rejected",
            ValidationStatus::Error => "Error",
        };
        write!(f, "{}", name)
    }
}

pub fn is_terminal(status: &ValidationStatus) -> bool {
    matches!(status, ValidationStatus::Validated | ValidationStatus::Invalidated | ValidationStatus::Rejected)
}

/// Transitions only happen via an explicit status lookup; submission alone
/// never moves a document out of Pending. Terminal states may only re-enter
/// themselves (the Authority re-reporting the same outcome is not a change).
pub fn ensure_valid_transition(from: &ValidationStatus, to: &ValidationStatus) -> Result<()> {
    if from == to {
        return Ok(());
    }
    match from {
        ValidationStatus::Pending | ValidationStatus::Error => Ok(()),
        _ if is_terminal(from) => {
            Err(GatewayError::InvalidStateTransition { from: from.to_string(), to: to.to_string() })
        }
        _ => Ok(()),
    }
}
