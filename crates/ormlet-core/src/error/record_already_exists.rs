use super::Error;
use crate::stmt::Id;

/// Error when a record is inserted under an id its table already holds.
#[derive(Debug)]
pub(super) struct RecordAlreadyExists {
    model: Box<str>,
    id: Id,
}

impl std::error::Error for RecordAlreadyExists {}

impl core::fmt::Display for RecordAlreadyExists {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "record already exists: {} with id {}", self.model, self.id)
    }
}

impl Error {
    /// Creates a record already exists error.
    pub fn record_already_exists(model: impl Into<String>, id: Id) -> Error {
        Error::from(super::ErrorKind::RecordAlreadyExists(RecordAlreadyExists {
            model: model.into().into(),
            id,
        }))
    }

    /// Returns `true` if this error is a record already exists error.
    pub fn is_record_already_exists(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::RecordAlreadyExists(_))
    }
}
