use std::fmt;

use thiserror::Error;

/// Inline message attached to a row while its source is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    MissingName,
    DuplicateName,
    MissingValue,
    NoExistingParameters,
    UnknownExisting,
}

impl RowError {
    pub fn message(self) -> &'static str {
        match self {
            RowError::MissingName => "Please provide parameter name",
            RowError::DuplicateName => "This parameter name already exists",
            RowError::MissingValue => "Please provide a value",
            RowError::NoExistingParameters => "There are currently no dashboard parameters",
            RowError::UnknownExisting => "Please select an existing dashboard parameter",
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("row is not being edited")]
    NotEditing,
    #[error("cannot save '{name}': {reason}")]
    NotFulfilled { name: String, reason: RowError },
    #[error("no mapping at row {index}")]
    RowOutOfRange { index: usize },
}
