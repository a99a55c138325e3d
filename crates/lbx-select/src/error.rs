#![forbid(unsafe_code)]

//! Validation errors surfaced through change and blur notifications.
//!
//! The engine has one error kind. It is never returned as `Err` and never
//! aborts a transition: the control degrades to "no selection, error message
//! present" and the host decides what to show.

use std::fmt;

use crate::value::SelectionValue;

/// Error code for the required-value check (stable, for i18n lookup).
pub const ERROR_CODE_REQUIRED: &str = "required";

/// A validation error attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "code", rename_all = "snake_case"))]
pub enum SelectError {
    /// A non-optional control holds an empty value.
    #[cfg_attr(feature = "serde", serde(rename = "required"))]
    RequiredValueMissing {
        /// Pre-resolved message from the label provider, passed through as-is.
        message: String,
    },
}

impl SelectError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RequiredValueMissing { .. } => ERROR_CODE_REQUIRED,
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::RequiredValueMissing { message } => message,
        }
    }
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SelectError {}

/// True iff a non-optional control holds an empty value.
///
/// Empty means `""` in single mode and no entries in multiple mode. This is
/// the only validation the engine performs; format and custom rules belong
/// to the caller.
#[must_use]
pub fn required_value_violated(value: &SelectionValue, optional: bool) -> bool {
    !optional && value.is_empty()
}

/// Run the required-value check, producing the error to attach.
#[must_use]
pub fn check_required(
    value: &SelectionValue,
    optional: bool,
    message: &str,
) -> Option<SelectError> {
    required_value_violated(value, optional).then(|| SelectError::RequiredValueMissing {
        message: message.to_owned(),
    })
}
