use super::Error;

/// Error when a field is used in a way its declaration does not allow.
///
/// Examples: reading a relation that was never declared, assigning a value to
/// a backward relation accessor, or passing a scalar where a many-to-many
/// field expects a list of ids.
#[derive(Debug)]
pub(super) struct InvalidField {
    message: Box<str>,
}

impl std::error::Error for InvalidField {}

impl core::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid field: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid field error.
    pub fn invalid_field(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidField(InvalidField {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid field error.
    pub fn is_invalid_field(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidField(_))
    }
}
