mod lookup;
pub use lookup::{Direction, Lookup};

use crate::planner::Planner;
use crate::{Instance, Session};

use ormlet_core::db::Table;
use ormlet_core::schema::{ManyToMany, Model};
use ormlet_core::stmt::{Id, Props, Record, Value};
use ormlet_core::Result;

use indexmap::IndexSet;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A lazy, chainable selection of one model's rows.
///
/// Building a query set reads nothing. The first consuming call (`count`,
/// `to_ref_array`, `first`, ...) evaluates the whole pipeline against the
/// session's current snapshot and caches the rows on this query set. Chaining
/// produces a fresh query set that evaluates again.
#[derive(Clone)]
pub struct QuerySet<'a> {
    session: &'a Session,
    model: &'a Model,
    source: Source,
    clauses: Vec<Clause<'a>>,
    rows: OnceCell<Vec<Row>>,
}

/// Rows a query set starts from
#[derive(Debug, Clone)]
enum Source {
    /// Every row of the model's table
    Table,

    /// Rows of the target table linked to `own` through a many-to-many relation
    Links { relation: ManyToMany, own: Id },
}

#[derive(Debug, Clone)]
enum Clause<'a> {
    Filter(Lookup<'a>),
    Exclude(Lookup<'a>),
    OrderBy(String, Direction),
}

type Row = (Id, Arc<Record>);

impl<'a> QuerySet<'a> {
    pub(crate) fn new(session: &'a Session, model: &'a Model) -> QuerySet<'a> {
        QuerySet {
            session,
            model,
            source: Source::Table,
            clauses: vec![],
            rows: OnceCell::new(),
        }
    }

    pub(crate) fn linked(
        session: &'a Session,
        relation: &ManyToMany,
        own: Id,
    ) -> QuerySet<'a> {
        QuerySet {
            source: Source::Links {
                relation: relation.clone(),
                own,
            },
            ..QuerySet::new(session, session.schema().model(relation.target))
        }
    }

    /// The model whose rows this query set selects.
    pub fn model(&self) -> &'a Model {
        self.model
    }

    /// Keeps rows whose fields equal every value in `props`.
    pub fn filter(self, props: Props) -> QuerySet<'a> {
        self.push(Clause::Filter(Lookup::Props(props)))
    }

    /// Keeps rows for which `f` returns `true`.
    pub fn filter_by(self, f: impl Fn(&Record) -> bool + 'a) -> QuerySet<'a> {
        self.push(Clause::Filter(Lookup::Predicate(Rc::new(f))))
    }

    /// Drops rows whose fields equal every value in `props`.
    pub fn exclude(self, props: Props) -> QuerySet<'a> {
        self.push(Clause::Exclude(Lookup::Props(props)))
    }

    pub fn exclude_by(self, f: impl Fn(&Record) -> bool + 'a) -> QuerySet<'a> {
        self.push(Clause::Exclude(Lookup::Predicate(Rc::new(f))))
    }

    /// Sorts rows by `field`. The sort is stable, so rows with equal values
    /// keep their previous order.
    pub fn order_by(self, field: impl Into<String>, direction: Direction) -> QuerySet<'a> {
        self.push(Clause::OrderBy(field.into(), direction))
    }

    /// An unevaluated copy of this query set.
    pub fn all(&self) -> QuerySet<'a> {
        QuerySet {
            rows: OnceCell::new(),
            ..self.clone()
        }
    }

    pub fn count(&self) -> usize {
        self.rows().len()
    }

    pub fn exists(&self) -> bool {
        !self.rows().is_empty()
    }

    /// The selected rows as shared immutable records.
    pub fn to_ref_array(&self) -> Vec<Arc<Record>> {
        self.rows().iter().map(|(_, record)| record.clone()).collect()
    }

    /// The selected rows as bound instances.
    pub fn to_model_array(&self) -> Vec<Instance<'a>> {
        self.iter().collect()
    }

    pub fn ids(&self) -> Vec<Id> {
        self.rows().iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = Instance<'a>> + '_ {
        self.rows()
            .iter()
            .map(|(id, _)| Instance::new(self.session, self.model, id.clone()))
    }

    pub fn at(&self, index: usize) -> Option<Instance<'a>> {
        let (id, _) = self.rows().get(index)?;
        Some(Instance::new(self.session, self.model, id.clone()))
    }

    pub fn first(&self) -> Option<Instance<'a>> {
        self.at(0)
    }

    pub fn last(&self) -> Option<Instance<'a>> {
        self.at(self.count().checked_sub(1)?)
    }

    /// Deletes every selected row, and its many-to-many links, in one write.
    pub fn delete(&self) -> Result<()> {
        let mut planner = Planner::new(self.session);
        for (id, _) in self.rows() {
            planner.delete(self.model, id.clone());
        }
        planner.commit()
    }

    /// Applies `props` to every selected row in one write.
    pub fn update(&self, props: Props) -> Result<()> {
        let mut planner = Planner::new(self.session);
        for (id, _) in self.rows() {
            planner.update(self.model, id, props.clone())?;
        }
        planner.commit()
    }

    fn push(mut self, clause: Clause<'a>) -> QuerySet<'a> {
        self.clauses.push(clause);
        self.rows = OnceCell::new();
        self
    }

    fn rows(&self) -> &Vec<Row> {
        self.rows.get_or_init(|| self.evaluate())
    }

    fn evaluate(&self) -> Vec<Row> {
        let mut rows = match &self.source {
            Source::Table => {
                let table = self.session.table(self.model);
                table
                    .iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            }
            Source::Links { relation, own } => self.linked_rows(relation, own),
        };

        for clause in &self.clauses {
            match clause {
                Clause::Filter(lookup) => rows.retain(|(_, record)| lookup.matches(record)),
                Clause::Exclude(lookup) => rows.retain(|(_, record)| !lookup.matches(record)),
                Clause::OrderBy(field, direction) => rows.sort_by(|(_, a), (_, b)| {
                    let ord = a.value(field).sort_cmp(b.value(field));
                    match direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                }),
            }
        }

        tracing::trace!(model = %self.model.name, rows = rows.len(), "query set evaluated");
        rows
    }

    /// Target rows linked to `own`, in target-table order. Links to ids
    /// missing from the target table are skipped.
    fn linked_rows(&self, relation: &ManyToMany, own: &Id) -> Vec<Row> {
        let schema = self.session.schema();
        let through = self.session.table(schema.model(relation.through));
        let own = Value::from(own);

        let linked: IndexSet<Id> = through
            .records()
            .filter(|link| link.value(&relation.own_field) == &own)
            .filter_map(|link| link.value(&relation.other_field).to_id())
            .collect();
        drop(through);

        let target: Arc<Table> = self.session.table(self.model);
        let mut rows: Vec<(usize, Row)> = linked
            .into_iter()
            .filter_map(|id| {
                let (position, record) = target.get_full(&id)?;
                Some((position, (id, record.clone())))
            })
            .collect();
        rows.sort_by_key(|(position, _)| *position);
        rows.into_iter().map(|(_, row)| row).collect()
    }
}

impl fmt::Debug for QuerySet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("model", &self.model.name)
            .field("source", &self.source)
            .field("clauses", &self.clauses)
            .field("evaluated", &self.rows.get().is_some())
            .finish()
    }
}
