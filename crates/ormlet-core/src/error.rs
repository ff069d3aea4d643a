mod adhoc;
mod invalid_field;
mod invalid_schema;
mod record_already_exists;
mod record_not_found;
mod relation_link;
mod relation_unlink;
mod too_many_records;

use adhoc::AdhocError;
use invalid_field::InvalidField;
use invalid_schema::InvalidSchema;
use record_already_exists::RecordAlreadyExists;
use record_not_found::RecordNotFoundError;
use relation_link::RelationLinkError;
use relation_unlink::RelationUnlinkError;
use std::sync::Arc;
use too_many_records::TooManyRecordsError;

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// Errors raised while building a schema or writing to a snapshot.
///
/// Cloning is cheap; the error itself is a single pointer.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorKind>,
}

impl Error {
    /// Wraps this error in a note describing what was being attempted.
    ///
    /// Notes display outermost first: `"loading fixtures: record not found: ..."`.
    /// Predicates such as [`Error::is_record_not_found`] look through notes to
    /// the root cause.
    pub fn context(self, note: impl core::fmt::Display) -> Error {
        Error::from(ErrorKind::Context {
            note: note.to_string().into_boxed_str(),
            cause: self,
        })
    }

    /// The kind of the innermost error, skipping any notes.
    fn kind(&self) -> &ErrorKind {
        let mut kind = &*self.inner;
        while let ErrorKind::Context { cause, .. } = kind {
            kind = &*cause.inner;
        }
        kind
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.inner {
            ErrorKind::Context { cause, .. } => Some(cause),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&*self.inner, f)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            core::fmt::Debug::fmt(&*self.inner, f)
        } else {
            core::fmt::Display::fmt(self, f)
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Context { note: Box<str>, cause: Error },
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    InvalidSchema(InvalidSchema),
    InvalidField(InvalidField),
    RecordNotFound(RecordNotFoundError),
    RecordAlreadyExists(RecordAlreadyExists),
    TooManyRecords(TooManyRecordsError),
    RelationLink(RelationLinkError),
    RelationUnlink(RelationUnlinkError),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Context { note, cause } => write!(f, "{note}: {cause}"),
            Anyhow(err) => write!(f, "{err}"),
            Adhoc(err) => write!(f, "{err}"),
            InvalidSchema(err) => write!(f, "{err}"),
            InvalidField(err) => write!(f, "{err}"),
            RecordNotFound(err) => write!(f, "{err}"),
            RecordAlreadyExists(err) => write!(f, "{err}"),
            TooManyRecords(err) => write!(f, "{err}"),
            RelationLink(err) => write!(f, "{err}"),
            RelationUnlink(err) => write!(f, "{err}"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(kind),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}
