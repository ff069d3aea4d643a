use super::Error;

/// A lookup by id, or by matching attributes, found nothing.
#[derive(Debug)]
pub(super) struct RecordNotFoundError {
    /// Model and id or criteria that were looked up
    lookup: Box<str>,
}

impl std::error::Error for RecordNotFoundError {}

impl core::fmt::Display for RecordNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "record not found: {}", self.lookup)
    }
}

impl Error {
    /// Creates a record not found error, e.g. for `"Book with id 10"`.
    pub fn record_not_found(lookup: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RecordNotFound(RecordNotFoundError {
            lookup: lookup.into().into_boxed_str(),
        }))
    }

    pub fn is_record_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::RecordNotFound(_))
    }
}
