use crate::planner::Planner;
use crate::relation::{Many, Related};
use crate::{QuerySet, Session};

use ormlet_core::schema::{self, Relation};
use ormlet_core::stmt::{Id, Props, Record, Value};
use ormlet_core::{Error, Result};

use std::fmt;
use std::sync::Arc;

/// A record of one model, bound to a session by id.
///
/// An instance holds no row data of its own: every read goes to the
/// session's current snapshot, so it always sees the latest committed state
/// of its record.
#[derive(Clone)]
pub struct Instance<'a> {
    session: &'a Session,
    model: &'a schema::Model,
    id: Id,
}

impl<'a> Instance<'a> {
    pub(crate) fn new(session: &'a Session, model: &'a schema::Model, id: Id) -> Instance<'a> {
        Instance { session, model, id }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn model(&self) -> &'a schema::Model {
        self.model
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// Returns `false` once the record has been deleted.
    pub fn exists(&self) -> bool {
        self.session.table(self.model).contains(&self.id)
    }

    /// The current row.
    pub fn record(&self) -> Result<Arc<Record>> {
        self.session
            .table(self.model)
            .get(&self.id)
            .cloned()
            .ok_or_else(|| self.not_found())
    }

    /// The stored value of `field`; null when the row does not hold it.
    pub fn get(&self, field: &str) -> Result<Value> {
        Ok(self.record()?.value(field).clone())
    }

    /// Assigns one field. Assigning the value already held writes nothing.
    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let mut props = Props::new();
        props.insert(field.into(), value.into());
        self.update(props)
    }

    /// Assigns several fields in one write. Many-to-many values replace the
    /// record's links, touching only the links that change.
    pub fn update(&self, props: Props) -> Result<()> {
        let mut planner = Planner::new(self.session);
        planner.update(self.model, &self.id, props)?;
        planner.commit()
    }

    /// Removes the record and its many-to-many links. Records pointing at it
    /// through foreign keys are kept.
    pub fn delete(&self) -> Result<()> {
        if !self.exists() {
            return Err(self.not_found());
        }
        let mut planner = Planner::new(self.session);
        planner.delete(self.model, self.id.clone());
        planner.commit()
    }

    /// Resolves the relation accessor `name`.
    pub fn relation(&self, name: &str) -> Result<Related<'a>> {
        let schema = self.session.schema();

        match self.relation_named(name)? {
            Relation::BelongsTo(relation) => {
                let target = schema.model(relation.target);
                let id = self
                    .record()?
                    .value(&relation.field)
                    .to_id()
                    .filter(|id| self.session.table(target).contains(id));
                Ok(Related::One(
                    id.map(|id| Instance::new(self.session, target, id)),
                ))
            }
            Relation::HasOne(relation) => {
                let source = schema.model(relation.source);
                let own = Value::from(&self.id);
                let id = self
                    .session
                    .table(source)
                    .iter()
                    .find(|(_, record)| record.value(&relation.field) == &own)
                    .map(|(id, _)| id.clone());
                Ok(Related::One(
                    id.map(|id| Instance::new(self.session, source, id)),
                ))
            }
            Relation::HasMany(relation) => {
                let source = schema.model(relation.source);
                let mut props = Props::new();
                props.insert(relation.field.clone(), Value::from(&self.id));
                Ok(Related::Many(QuerySet::new(self.session, source).filter(props)))
            }
            Relation::ManyToMany(relation) => Ok(Related::Many(QuerySet::linked(
                self.session,
                relation,
                self.id.clone(),
            ))),
        }
    }

    /// The single record a forward or one-to-one relation points at, if it
    /// exists.
    pub fn related(&self, name: &str) -> Result<Option<Instance<'a>>> {
        match self.relation(name)? {
            Related::One(instance) => Ok(instance),
            Related::Many(_) => Err(Error::invalid_field(format!(
                "`{}.{name}` holds many records; use `query`",
                self.model.name
            ))),
        }
    }

    /// The records a backward or many-to-many relation yields.
    pub fn query(&self, name: &str) -> Result<QuerySet<'a>> {
        match self.relation(name)? {
            Related::Many(query) => Ok(query),
            Related::One(_) => Err(Error::invalid_field(format!(
                "`{}.{name}` holds a single record; use `related`",
                self.model.name
            ))),
        }
    }

    /// The link manager of a many-to-many relation.
    pub fn many(&self, name: &str) -> Result<Many<'a>> {
        match self.relation_named(name)? {
            Relation::ManyToMany(relation) => Ok(Many::new(
                self.session,
                self.model,
                name,
                relation,
                self.id.clone(),
            )),
            _ => Err(Error::invalid_field(format!(
                "`{}.{name}` is not a many-to-many relation",
                self.model.name
            ))),
        }
    }

    fn relation_named(&self, name: &str) -> Result<&'a Relation> {
        self.model.relation(name).ok_or_else(|| {
            Error::invalid_field(format!("`{}.{name}` is not a relation", self.model.name))
        })
    }

    fn not_found(&self) -> Error {
        Error::record_not_found(format!("{} with id {}", self.model.name, self.id))
    }
}

impl PartialEq for Instance<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.model.id == other.model.id && self.id == other.id
    }
}

impl From<&Instance<'_>> for Value {
    fn from(instance: &Instance<'_>) -> Value {
        Value::from(&instance.id)
    }
}

impl From<Instance<'_>> for Value {
    fn from(instance: Instance<'_>) -> Value {
        Value::from(instance.id)
    }
}

impl fmt::Debug for Instance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.model.name, self.id)
    }
}
