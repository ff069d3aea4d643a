use super::Database;
use crate::stmt::{Id, Props, Record};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// A record-level edit to one table.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Append a new record under `Id`
    Insert(Id, Record),

    /// Overwrite the given fields of an existing record
    Update(Id, Props),

    /// Remove a record
    Delete(Id),
}

/// A set of per-table edits to apply to a snapshot as one unit.
///
/// An update is validated in full before anything is written, so a failing
/// update never leaves a snapshot partially edited.
#[derive(Debug, Clone, Default)]
pub struct Update {
    ops: IndexMap<String, Vec<Op>>,
}

/// An [`Update`] that was checked against a snapshot and stripped of edits
/// that would not change it.
#[derive(Debug)]
pub struct Prepared {
    ops: IndexMap<String, Vec<Op>>,
}

impl Update {
    pub fn new() -> Update {
        Update::default()
    }

    pub fn insert(&mut self, table: &str, id: Id, record: Record) -> &mut Self {
        self.push(table, Op::Insert(id, record))
    }

    pub fn update(&mut self, table: &str, id: Id, props: Props) -> &mut Self {
        self.push(table, Op::Update(id, props))
    }

    pub fn delete(&mut self, table: &str, id: Id) -> &mut Self {
        self.push(table, Op::Delete(id))
    }

    pub fn push(&mut self, table: &str, op: Op) -> &mut Self {
        match self.ops.get_mut(table) {
            Some(ops) => ops.push(op),
            None => {
                self.ops.insert(table.to_string(), vec![op]);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of record-level edits.
    pub fn len(&self) -> usize {
        self.ops.values().map(Vec::len).sum()
    }

    /// Names of the tables this update edits.
    pub fn tables(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.keys().map(String::as_str)
    }

    /// Checks every edit against `db`.
    ///
    /// Edits run in order, so an edit sees the effect of earlier edits to the
    /// same table. Inserting an id that exists, or whose display form matches
    /// an existing id of the other kind (`0` and `"0"`), fails, as does
    /// updating or deleting an id that does not exist. Updates that assign only the values a record
    /// already holds are dropped.
    pub fn prepare(self, db: &Database) -> Result<Prepared> {
        let mut prepared = IndexMap::new();

        for (name, ops) in self.ops {
            let Some(table) = db.table(&name) else {
                return Err(crate::err!("unknown table `{name}`"));
            };

            // Presence of ids touched by earlier edits in this update
            let mut overlay: HashMap<Id, bool> = HashMap::new();
            let mut kept = Vec::with_capacity(ops.len());

            for op in ops {
                let exists = |overlay: &HashMap<Id, bool>, id: &Id| {
                    overlay.get(id).copied().unwrap_or_else(|| table.contains(id))
                };

                match op {
                    Op::Insert(id, record) => {
                        if exists(&overlay, &id) {
                            return Err(Error::record_already_exists(name, id));
                        }
                        if let Some(twin) = id.display_twin().filter(|twin| exists(&overlay, twin)) {
                            return Err(Error::record_already_exists(name, twin));
                        }
                        overlay.insert(id.clone(), true);
                        kept.push(Op::Insert(id, record));
                    }
                    Op::Update(id, props) => {
                        if !exists(&overlay, &id) {
                            return Err(Error::record_not_found(format!("{name} with id {id}")));
                        }
                        let unchanged = !overlay.contains_key(&id)
                            && table
                                .get(&id)
                                .is_some_and(|record| record.is_unchanged_by(&props));
                        if !unchanged {
                            kept.push(Op::Update(id, props));
                        }
                    }
                    Op::Delete(id) => {
                        if !exists(&overlay, &id) {
                            return Err(Error::record_not_found(format!("{name} with id {id}")));
                        }
                        overlay.insert(id.clone(), false);
                        kept.push(Op::Delete(id));
                    }
                }
            }

            if !kept.is_empty() {
                prepared.insert(name, kept);
            }
        }

        Ok(Prepared { ops: prepared })
    }
}

impl Prepared {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.values().map(Vec::len).sum()
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.keys().map(String::as_str)
    }

    pub(super) fn into_ops(self) -> IndexMap<String, Vec<Op>> {
        self.ops
    }
}

/// Runs prepared edits against one table; consecutive deletes are removed in
/// a single pass.
pub(super) fn write(table: &mut super::Table, ops: Vec<Op>) {
    let mut deletes = HashSet::new();

    for op in ops {
        match op {
            Op::Delete(id) => {
                deletes.insert(id);
            }
            Op::Insert(id, record) => {
                table.remove(&std::mem::take(&mut deletes));
                table.insert(id, record);
            }
            Op::Update(id, props) => {
                table.remove(&std::mem::take(&mut deletes));
                table.update(&id, props);
            }
        }
    }

    table.remove(&deletes);
}
