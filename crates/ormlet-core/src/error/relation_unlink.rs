use super::relation_link::write_ids;
use super::Error;
use crate::stmt::Id;

/// Error when `remove` is given an id that is not linked.
#[derive(Debug)]
pub(super) struct RelationUnlinkError {
    path: Box<str>,
    ids: Vec<Id>,
}

impl std::error::Error for RelationUnlinkError {}

impl core::fmt::Display for RelationUnlinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no link in `{}` for id", self.path)?;
        if self.ids.len() > 1 {
            f.write_str("s")?;
        }
        f.write_str(" ")?;
        write_ids(f, &self.ids)
    }
}

impl Error {
    /// Creates a relation unlink error naming the relation and missing ids.
    pub fn relation_unlink(path: impl Into<String>, ids: Vec<Id>) -> Error {
        Error::from(super::ErrorKind::RelationUnlink(RelationUnlinkError {
            path: path.into().into(),
            ids,
        }))
    }

    /// Returns `true` if this error is a relation unlink error.
    pub fn is_relation_unlink(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::RelationUnlink(_))
    }
}
