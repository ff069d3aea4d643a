use super::Error;

/// Error when a schema definition is invalid.
///
/// This occurs when:
/// - Two models are registered under the same name
/// - A relation targets a model that was never registered
/// - A custom through model's foreign keys cannot be matched to the two
///   sides of a many-to-many relation, or match ambiguously
/// - A derived relation accessor collides with an existing field name
///
/// These errors are raised once, while the registry is built.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSchema(_))
    }
}
