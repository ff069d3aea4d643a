use crate::Session;

use ormlet_core::db::Update;
use ormlet_core::schema::{ManyToMany, Model, ModelId, Relation};
use ormlet_core::stmt::{Id, Props, Record, Value};
use ormlet_core::{Error, Result};

use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};

/// Collects the edits of one logical write into a single [`Update`].
///
/// Edits are checked as they are planned, and nothing reaches the session
/// until [`Planner::commit`], so a failing write leaves the snapshot as it
/// was.
pub(crate) struct Planner<'a> {
    session: &'a Session,

    update: Update,

    /// Next sequential id per model, past every id seen so far. `None` once
    /// `i64::MAX` is taken.
    next_ids: HashMap<ModelId, Option<i64>>,

    /// Rows already planned for deletion
    deleted: HashSet<(ModelId, Id)>,
}

impl<'a> Planner<'a> {
    pub(crate) fn new(session: &'a Session) -> Planner<'a> {
        Planner {
            session,
            update: Update::new(),
            next_ids: HashMap::new(),
            deleted: HashSet::new(),
        }
    }

    /// Plans the creation of a `model` record and returns its id.
    ///
    /// Many-to-many values link the new record to the listed ids, whether or
    /// not those exist yet. Links already present from the other side count
    /// as made.
    pub(crate) fn create(&mut self, model: &Model, props: Props) -> Result<Id> {
        let id_attribute = model.id_attribute();

        let id = match props.get(id_attribute).filter(|value| !value.is_null()) {
            Some(value) => {
                let id = value.to_id().ok_or_else(|| {
                    Error::invalid_field(format!(
                        "`{}.{id_attribute}` must be an integer or string, got {value}",
                        model.name
                    ))
                })?;
                self.observe(model, &id);
                id
            }
            None => self.generate_id(model)?,
        };

        let mut record = Record::new();
        record.insert(id_attribute, &id);
        let mut links = vec![];

        for (key, value) in props {
            if key == id_attribute {
                continue;
            }
            match assignment(model, &key, &value)? {
                Some(relation) => links.push((key, relation, value)),
                None => {
                    record.insert(key, value);
                }
            }
        }

        for field in model.attrs() {
            if record.contains(&field.name) {
                continue;
            }
            if let Some(default) = field.ty.as_attr().and_then(|attr| attr.default.as_ref()) {
                record.insert(&field.name, default.call());
            }
        }

        self.update.insert(&model.name, id.clone(), record);

        for (key, relation, value) in links {
            let path = format!("{}.{key}", model.name);
            let ids = list_ids(&path, value)?;
            let linked = self.linked_ids(relation, &id);
            for other in ids {
                if !linked.contains(&other) {
                    self.insert_link(relation, &id, other)?;
                }
            }
        }

        Ok(id)
    }

    /// Plans field assignments on an existing record.
    ///
    /// Many-to-many values replace the record's links by diffing: links to
    /// ids no longer listed are removed, newly listed ids are linked, and the
    /// rest are left alone.
    pub(crate) fn update(&mut self, model: &Model, id: &Id, props: Props) -> Result<()> {
        if !self.session.table(model).contains(id) {
            return Err(Error::record_not_found(format!("{} with id {id}", model.name)));
        }

        let id_attribute = model.id_attribute();
        let mut assignments = Props::new();

        for (key, value) in props {
            if key == id_attribute {
                if value.to_id().as_ref() != Some(id) {
                    return Err(Error::invalid_field(format!(
                        "`{}.{key}` identifies the record and cannot change",
                        model.name
                    )));
                }
                continue;
            }

            match assignment(model, &key, &value)? {
                Some(relation) => {
                    let path = format!("{}.{key}", model.name);
                    let ids = list_ids(&path, value)?;
                    self.set_links(relation, id, ids)?;
                }
                None => {
                    assignments.insert(key, value);
                }
            }
        }

        if !assignments.is_empty() {
            self.update.update(&model.name, id.clone(), assignments);
        }
        Ok(())
    }

    /// Plans the removal of a record and of its many-to-many links. Records
    /// pointing at it through foreign keys are kept.
    pub(crate) fn delete(&mut self, model: &Model, id: Id) {
        for relation in model.relations.values() {
            if let Relation::ManyToMany(relation) = relation {
                self.clear(relation, &id);
            }
        }
        self.delete_row(model, id);
    }

    /// Links `own` to each of `ids`. Fails if any of them is already linked.
    pub(crate) fn add(
        &mut self,
        relation: &ManyToMany,
        path: &str,
        own: &Id,
        ids: Vec<Id>,
    ) -> Result<()> {
        let linked = self.linked_ids(relation, own);
        let existing: Vec<Id> = ids.iter().filter(|id| linked.contains(*id)).cloned().collect();
        if !existing.is_empty() {
            return Err(Error::relation_link(path, existing));
        }

        for other in ids {
            self.insert_link(relation, own, other)?;
        }
        Ok(())
    }

    /// Unlinks `own` from each of `ids`. Fails if any of them is not linked.
    pub(crate) fn remove(
        &mut self,
        relation: &ManyToMany,
        path: &str,
        own: &Id,
        ids: Vec<Id>,
    ) -> Result<()> {
        let ids: IndexSet<Id> = ids.into_iter().collect();
        let links = self.links(relation, own);
        let linked: HashSet<&Id> = links.iter().map(|(_, other)| other).collect();

        let missing: Vec<Id> = ids.iter().filter(|id| !linked.contains(id)).cloned().collect();
        if !missing.is_empty() {
            return Err(Error::relation_unlink(path, missing));
        }

        let session = self.session;
        let through = session.schema().model(relation.through);
        for (row, other) in links {
            if ids.contains(&other) {
                self.delete_row(through, row);
            }
        }
        Ok(())
    }

    /// Removes every link of `own`.
    pub(crate) fn clear(&mut self, relation: &ManyToMany, own: &Id) {
        let session = self.session;
        let through = session.schema().model(relation.through);
        for (row, _) in self.links(relation, own) {
            self.delete_row(through, row);
        }
    }

    /// Makes `ids` the set of ids linked to `own`, touching only the links
    /// that differ.
    pub(crate) fn set_links(&mut self, relation: &ManyToMany, own: &Id, ids: Vec<Id>) -> Result<()> {
        let session = self.session;
        let through = session.schema().model(relation.through);
        let requested: HashSet<&Id> = ids.iter().collect();
        let mut linked = HashSet::new();

        for (row, other) in self.links(relation, own) {
            if requested.contains(&other) {
                linked.insert(other);
            } else {
                self.delete_row(through, row);
            }
        }

        for other in &ids {
            if !linked.contains(other) {
                self.insert_link(relation, own, other.clone())?;
            }
        }
        Ok(())
    }

    /// Writes the planned edits to the session.
    pub(crate) fn commit(self) -> Result<()> {
        if self.update.is_empty() {
            return Ok(());
        }
        self.session.apply(self.update)
    }

    /// Through rows holding `own` on the relation's own side, as
    /// `(row id, other id)` pairs in through-table order.
    pub(crate) fn links(&self, relation: &ManyToMany, own: &Id) -> Vec<(Id, Id)> {
        let through = self.session.table(self.session.schema().model(relation.through));
        let own = Value::from(own);

        through
            .iter()
            .filter(|(_, link)| link.value(&relation.own_field) == &own)
            .filter_map(|(row, link)| Some((row.clone(), link.value(&relation.other_field).to_id()?)))
            .collect()
    }

    fn delete_row(&mut self, model: &Model, id: Id) {
        if self.deleted.insert((model.id, id.clone())) {
            self.update.delete(&model.name, id);
        }
    }

    fn linked_ids(&self, relation: &ManyToMany, own: &Id) -> HashSet<Id> {
        self.links(relation, own)
            .into_iter()
            .map(|(_, other)| other)
            .collect()
    }

    fn insert_link(&mut self, relation: &ManyToMany, own: &Id, other: Id) -> Result<()> {
        let session = self.session;
        let through = session.schema().model(relation.through);
        let mut props = Props::new();
        props.insert(relation.own_field.clone(), Value::from(own));
        props.insert(relation.other_field.clone(), Value::from(other));
        self.create(through, props)?;
        Ok(())
    }

    fn generate_id(&mut self, model: &Model) -> Result<Id> {
        let id = match model.id_default() {
            Some(default) => {
                let value = default.call();
                value.to_id().ok_or_else(|| {
                    Error::invalid_field(format!(
                        "default of `{}.{}` must produce an integer or string, got {value}",
                        model.name,
                        model.id_attribute()
                    ))
                })?
            }
            None => {
                let next = *self.next_id_slot(model);
                model.auto.generate(next).ok_or_else(|| {
                    Error::invalid_field(format!(
                        "`{}` has no sequential ids left; pass `{}` explicitly",
                        model.name,
                        model.id_attribute()
                    ))
                })?
            }
        };

        tracing::trace!(model = %model.name, %id, "id allocated");
        self.observe(model, &id);
        Ok(id)
    }

    /// Keeps the sequential counter past integer ids handed out explicitly.
    fn observe(&mut self, model: &Model, id: &Id) {
        if let Id::Int(value) = id {
            let next = self.next_id_slot(model);
            *next = (*next)
                .zip(value.checked_add(1))
                .map(|(next, after)| next.max(after));
        }
    }

    fn next_id_slot(&mut self, model: &Model) -> &mut Option<i64> {
        let session = self.session;
        self.next_ids
            .entry(model.id)
            .or_insert_with(|| session.table(model).next_id())
    }
}

/// Checks a prop against the model's relations. Returns the many-to-many
/// relation the prop assigns, if any.
fn assignment<'m>(model: &'m Model, key: &str, value: &Value) -> Result<Option<&'m ManyToMany>> {
    match model.relation(key) {
        Some(Relation::ManyToMany(relation)) => Ok(Some(relation)),
        Some(Relation::HasMany(_) | Relation::HasOne(_)) => Err(Error::invalid_field(format!(
            "`{}.{key}` is a backward relation; assign the foreign key on the related model instead",
            model.name
        ))),
        Some(Relation::BelongsTo(_)) if value.is_list() || value.is_map() => Err(Error::invalid_field(format!(
            "`{}.{key}` holds a single id, got {value}",
            model.name
        ))),
        _ => Ok(None),
    }
}

/// Reads a many-to-many prop as a list of distinct ids.
fn list_ids(path: &str, value: Value) -> Result<Vec<Id>> {
    match value {
        Value::List(items) => ids_of(path, items),
        Value::Null => Ok(vec![]),
        other => Err(Error::invalid_field(format!(
            "`{path}` expects a list of ids, got {other}"
        ))),
    }
}

/// Converts related values to ids.
pub(crate) fn to_ids(path: &str, items: Vec<Value>) -> Result<Vec<Id>> {
    items
        .iter()
        .map(|item| {
            item.to_id()
                .ok_or_else(|| Error::invalid_field(format!("`{path}` expects ids, got {item}")))
        })
        .collect()
}

/// Converts related values to ids. Fails if an id repeats.
pub(crate) fn ids_of(path: &str, items: Vec<Value>) -> Result<Vec<Id>> {
    let ids = to_ids(path, items)?;

    let mut seen = HashSet::new();
    let repeated: IndexSet<&Id> = ids.iter().filter(|id| !seen.insert(*id)).collect();
    if !repeated.is_empty() {
        return Err(Error::relation_link(path, repeated.into_iter().cloned().collect()));
    }

    Ok(ids)
}
