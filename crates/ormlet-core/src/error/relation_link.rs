use super::Error;
use crate::stmt::Id;

/// Error when a many-to-many link cannot be created.
///
/// This occurs when:
/// - `add` is given an id that is already linked
/// - a relation input sequence (on create, update or `add`) repeats an id
///
/// The message carries the relation path (`Model.relation`) so the failure
/// can be traced to a specific declaration.
#[derive(Debug)]
pub(super) struct RelationLinkError {
    path: Box<str>,
    ids: Vec<Id>,
}

impl std::error::Error for RelationLinkError {}

impl core::fmt::Display for RelationLinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "duplicate link in `{}` for id", self.path)?;
        if self.ids.len() > 1 {
            f.write_str("s")?;
        }
        f.write_str(" ")?;
        write_ids(f, &self.ids)
    }
}

pub(super) fn write_ids(f: &mut core::fmt::Formatter, ids: &[Id]) -> core::fmt::Result {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{id}")?;
    }
    Ok(())
}

impl Error {
    /// Creates a relation link error naming the relation and offending ids.
    pub fn relation_link(path: impl Into<String>, ids: Vec<Id>) -> Error {
        Error::from(super::ErrorKind::RelationLink(RelationLinkError {
            path: path.into().into(),
            ids,
        }))
    }

    /// Returns `true` if this error is a relation link error.
    pub fn is_relation_link(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::RelationLink(_))
    }
}
