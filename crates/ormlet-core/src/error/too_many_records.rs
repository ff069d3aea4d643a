use super::Error;

/// `get` matched more than one record.
#[derive(Debug)]
pub(super) struct TooManyRecordsError {
    lookup: Box<str>,
}

impl std::error::Error for TooManyRecordsError {}

impl core::fmt::Display for TooManyRecordsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "expected one record, but {}", self.lookup)
    }
}

impl Error {
    pub fn too_many_records(lookup: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TooManyRecords(TooManyRecordsError {
            lookup: lookup.into().into_boxed_str(),
        }))
    }

    pub fn is_too_many_records(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TooManyRecords(_))
    }
}
