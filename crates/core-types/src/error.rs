use crate::enums::RecordField;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Missing value for required field '{0}'")]
    MissingField(RecordField),

    #[error("Invalid value for field '{0}': {1}")]
    InvalidValue(RecordField, String),

    #[error("Unknown status group '{0}'")]
    UnknownStatusGroup(String),
}

impl CoreError {
    /// The record field this error is about.
    pub fn field(&self) -> RecordField {
        match self {
            CoreError::MissingField(field) | CoreError::InvalidValue(field, _) => *field,
            CoreError::UnknownStatusGroup(_) => RecordField::StatusGroup,
        }
    }
}
