use crate::planner::{self, Planner};
use crate::{QuerySet, Session};

use ormlet_core::schema::{ManyToMany, Model};
use ormlet_core::stmt::{Id, Record, Value};
use ormlet_core::{Error, Result};

use std::fmt;
use std::sync::Arc;

/// The links of one record on one side of a many-to-many relation.
///
/// Every operation edits the through table in a single write and fails
/// without writing anything when any of its ids is rejected.
pub struct Many<'a> {
    session: &'a Session,
    owner: &'a Model,
    path: String,
    relation: &'a ManyToMany,
    own: Id,
}

impl<'a> Many<'a> {
    pub(crate) fn new(
        session: &'a Session,
        owner: &'a Model,
        name: &str,
        relation: &'a ManyToMany,
        own: Id,
    ) -> Many<'a> {
        Many {
            session,
            owner,
            path: format!("{}.{name}", owner.name),
            relation,
            own,
        }
    }

    /// `Model.relation`, as named in errors.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The linked records of the target model.
    pub fn query(&self) -> QuerySet<'a> {
        QuerySet::linked(self.session, self.relation, self.own.clone())
    }

    pub fn count(&self) -> usize {
        self.query().count()
    }

    pub fn exists(&self) -> bool {
        self.query().exists()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.query().ids()
    }

    pub fn to_ref_array(&self) -> Vec<Arc<Record>> {
        self.query().to_ref_array()
    }

    /// Links each given record or id. Fails if one is already linked or
    /// listed twice.
    pub fn add<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let path = &self.path;
        let ids = planner::ids_of(path, items.into_iter().map(Into::into).collect())?;
        self.write(|planner| planner.add(self.relation, path, &self.own, ids))
    }

    /// Unlinks each given record or id. Fails if one is not linked.
    pub fn remove<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let path = &self.path;
        let ids = planner::to_ids(path, items.into_iter().map(Into::into).collect())?;
        self.write(|planner| planner.remove(self.relation, path, &self.own, ids))
    }

    /// Unlinks everything.
    pub fn clear(&self) -> Result<()> {
        self.write(|planner| {
            planner.clear(self.relation, &self.own);
            Ok(())
        })
    }

    /// Makes the given records or ids the linked set. Links that stay are
    /// left untouched, so extra attributes on a through model survive.
    pub fn update<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let path = &self.path;
        let ids = planner::ids_of(path, items.into_iter().map(Into::into).collect())?;
        self.write(|planner| planner.set_links(self.relation, &self.own, ids))
    }

    fn write(&self, f: impl FnOnce(&mut Planner<'a>) -> Result<()>) -> Result<()> {
        if !self.session.table(self.owner).contains(&self.own) {
            return Err(Error::record_not_found(format!(
                "{} with id {}",
                self.owner.name, self.own
            )));
        }

        let mut planner = Planner::new(self.session);
        f(&mut planner)?;
        planner.commit()
    }
}

impl fmt::Debug for Many<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Many")
            .field("path", &self.path)
            .field("own", &self.own)
            .finish()
    }
}
