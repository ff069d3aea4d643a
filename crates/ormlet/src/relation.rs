mod many;
pub use many::Many;

use crate::{Instance, QuerySet};

/// What a relation accessor resolves to.
#[derive(Debug)]
pub enum Related<'a> {
    /// Forward foreign keys and the backward side of one-to-one relations.
    /// `None` when the key is unset or points at a missing record.
    One(Option<Instance<'a>>),

    /// Backward foreign keys and both sides of many-to-many relations
    Many(QuerySet<'a>),
}

impl<'a> Related<'a> {
    pub fn is_many(&self) -> bool {
        matches!(self, Related::Many(_))
    }

    #[track_caller]
    pub fn expect_one(self) -> Option<Instance<'a>> {
        match self {
            Related::One(instance) => instance,
            Related::Many(query) => panic!("expected a single related record, but was {query:?}"),
        }
    }

    #[track_caller]
    pub fn expect_many(self) -> QuerySet<'a> {
        match self {
            Related::Many(query) => query,
            Related::One(instance) => panic!("expected related records, but was {instance:?}"),
        }
    }
}
