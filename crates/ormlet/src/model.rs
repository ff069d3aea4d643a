use crate::planner::Planner;
use crate::query_set::Direction;
use crate::{Instance, QuerySet, Session};

use ormlet_core::db::Table;
use ormlet_core::schema;
use ormlet_core::stmt::{Id, Props, Record, Value};
use ormlet_core::{Error, Result};

use std::fmt;
use std::sync::Arc;

/// Operations on one model's table, bound to a session.
#[derive(Clone, Copy)]
pub struct Model<'a> {
    session: &'a Session,
    model: &'a schema::Model,
}

impl<'a> Model<'a> {
    pub(crate) fn new(session: &'a Session, model: &'a schema::Model) -> Model<'a> {
        Model { session, model }
    }

    pub fn name(&self) -> &'a str {
        &self.model.name
    }

    /// The model's schema declaration.
    pub fn schema(&self) -> &'a schema::Model {
        self.model
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// The model's table in the session's current snapshot.
    pub fn table(&self) -> Arc<Table> {
        self.session.table(self.model)
    }

    /// Returns `true` if a record with this id exists. Values that cannot be
    /// ids, null included, return `false`.
    pub fn has_id(&self, id: impl Into<Value>) -> bool {
        id.into()
            .to_id()
            .is_some_and(|id| self.table().contains(&id))
    }

    pub fn with_id(&self, id: impl Into<Value>) -> Result<Instance<'a>> {
        let value = id.into();
        match value.to_id() {
            Some(id) if self.table().contains(&id) => {
                Ok(Instance::new(self.session, self.model, id))
            }
            _ => Err(Error::record_not_found(format!(
                "{} with id {value}",
                self.model.name
            ))),
        }
    }

    /// The one record whose fields equal every value in `props`.
    pub fn get(&self, props: Props) -> Result<Instance<'a>> {
        let criteria = describe(&props);
        let query = self.filter(props);

        match query.count() {
            0 => Err(Error::record_not_found(format!(
                "{} matching {criteria}",
                self.model.name
            ))),
            1 => query.first().ok_or_else(|| {
                Error::record_not_found(format!("{} matching {criteria}", self.model.name))
            }),
            n => Err(Error::too_many_records(format!(
                "{n} {} records match {criteria}",
                self.model.name
            ))),
        }
    }

    /// Creates a record.
    ///
    /// The id comes from `props`, else from the identifying attribute's
    /// default, else from the model's [`AutoStrategy`](schema::AutoStrategy).
    /// Omitted attributes with defaults get them. Many-to-many values link
    /// the new record to the listed ids, which need not exist yet.
    pub fn create(&self, props: Props) -> Result<Instance<'a>> {
        let mut planner = Planner::new(self.session);
        let id = planner.create(self.model, props)?;
        planner.commit()?;
        Ok(Instance::new(self.session, self.model, id))
    }

    /// Updates the record whose id `props` names, or creates it if there is
    /// none.
    pub fn upsert(&self, props: Props) -> Result<Instance<'a>> {
        let id = props
            .get(self.model.id_attribute())
            .and_then(Value::to_id)
            .filter(|id| self.table().contains(id));

        match id {
            Some(id) => {
                let instance = Instance::new(self.session, self.model, id);
                instance.update(props)?;
                Ok(instance)
            }
            None => self.create(props),
        }
    }

    pub fn all(&self) -> QuerySet<'a> {
        QuerySet::new(self.session, self.model)
    }

    pub fn filter(&self, props: Props) -> QuerySet<'a> {
        self.all().filter(props)
    }

    pub fn filter_by(&self, f: impl Fn(&Record) -> bool + 'a) -> QuerySet<'a> {
        self.all().filter_by(f)
    }

    pub fn exclude(&self, props: Props) -> QuerySet<'a> {
        self.all().exclude(props)
    }

    pub fn exclude_by(&self, f: impl Fn(&Record) -> bool + 'a) -> QuerySet<'a> {
        self.all().exclude_by(f)
    }

    pub fn order_by(&self, field: impl Into<String>, direction: Direction) -> QuerySet<'a> {
        self.all().order_by(field, direction)
    }

    pub fn count(&self) -> usize {
        self.table().len()
    }

    pub fn exists(&self) -> bool {
        !self.table().is_empty()
    }

    pub fn first(&self) -> Option<Instance<'a>> {
        let id = self.table().ids().next().cloned()?;
        Some(Instance::new(self.session, self.model, id))
    }

    pub fn last(&self) -> Option<Instance<'a>> {
        let id = self.table().ids().next_back().cloned()?;
        Some(Instance::new(self.session, self.model, id))
    }

    /// Ids of every record, in table order.
    pub fn ids(&self) -> Vec<Id> {
        self.table().ids().cloned().collect()
    }
}

impl fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Model").field(&self.model.name).finish()
    }
}

fn describe(props: &Props) -> String {
    let pairs: Vec<String> = props
        .iter()
        .map(|(field, value)| format!("{field} = {value}"))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}
