use super::{update, Prepared, Table, Update};
use crate::Result;

use by_address::ByAddress;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A full snapshot: every model's table, keyed by model name.
///
/// Tables sit behind `Arc`s so that snapshots produced from one another share
/// every table a write did not touch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Database {
    tables: IndexMap<String, Arc<Table>>,
}

impl Database {
    pub fn new() -> Database {
        Database::default()
    }

    /// Creates a snapshot holding an empty table for each name.
    pub fn with_tables<'a>(names: impl IntoIterator<Item = &'a str>) -> Database {
        Database {
            tables: names
                .into_iter()
                .map(|name| (name.to_string(), Arc::new(Table::new())))
                .collect(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &Arc<Table>)> + '_ {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Names of tables whose `Arc` differs from `other`'s by address.
    ///
    /// Tables present on only one side count as changed.
    pub fn changed_tables<'a>(&'a self, other: &'a Database) -> Vec<&'a str> {
        let mut changed = Vec::new();
        for (name, table) in &self.tables {
            let shared = other
                .tables
                .get(name)
                .is_some_and(|theirs| ByAddress(&**theirs) == ByAddress(&**table));
            if !shared {
                changed.push(name.as_str());
            }
        }

        changed.extend(
            other
                .tables
                .keys()
                .filter(|name| !self.tables.contains_key(*name))
                .map(String::as_str),
        );
        changed
    }

    /// Branches `db`: returns a new snapshot with `update` applied, sharing
    /// every untouched table and record with `db`.
    ///
    /// If the update changes nothing, `db` itself is returned.
    pub fn apply(db: &Arc<Database>, update: Update) -> Result<Arc<Database>> {
        let prepared = update.prepare(db)?;
        if prepared.is_empty() {
            return Ok(db.clone());
        }

        let mut next = Database::clone(db);
        next.commit(prepared);
        Ok(Arc::new(next))
    }

    /// Applies `update` to this snapshot in place. Returns `false` when the
    /// update changed nothing.
    ///
    /// Tables and records still shared with another snapshot are cloned
    /// before being written; uniquely held ones are edited directly.
    pub fn apply_mut(&mut self, update: Update) -> Result<bool> {
        let prepared = update.prepare(self)?;
        if prepared.is_empty() {
            return Ok(false);
        }
        self.commit(prepared);
        Ok(true)
    }

    /// Writes edits that were prepared against this snapshot.
    pub fn commit(&mut self, prepared: Prepared) {
        tracing::debug!(
            tables = ?prepared.tables().collect::<Vec<_>>(),
            ops = prepared.len(),
            "commit update"
        );

        for (name, ops) in prepared.into_ops() {
            let Some(table) = self.tables.get_mut(&name) else {
                continue;
            };
            update::write(Arc::make_mut(table), ops);
        }
    }
}
