use crate::stmt::{Id, Props, Record};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The rows of one model within a snapshot.
///
/// Rows keep insertion order (the `items` sequence of the exchanged shape)
/// and are looked up by id in constant time (`itemsById`). Both views come
/// from the same map, so they always hold the same set of ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: IndexMap<Id, Arc<Record>>,

    /// Highest integer id ever inserted; never lowered by deletes so that
    /// sequential ids are not reused.
    max_id: Option<i64>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.rows.contains_key(id)
    }

    pub fn get(&self, id: &Id) -> Option<&Arc<Record>> {
        self.rows.get(id)
    }

    /// The record under `id` along with its position in insertion order.
    pub fn get_full(&self, id: &Id) -> Option<(usize, &Arc<Record>)> {
        self.rows.get_full(id).map(|(index, _, record)| (index, record))
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &Id> + ExactSizeIterator + '_ {
        self.rows.keys()
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &Arc<Record>> + ExactSizeIterator + '_ {
        self.rows.values()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Id, &Arc<Record>)> + '_ {
        self.rows.iter()
    }

    /// The id the `Increment` strategy assigns next, or `None` once an id of
    /// `i64::MAX` has been stored.
    pub fn next_id(&self) -> Option<i64> {
        self.max_id.map_or(Some(0), |max| max.checked_add(1))
    }

    pub(crate) fn insert(&mut self, id: Id, record: Record) {
        if let Id::Int(value) = id {
            self.max_id = Some(self.max_id.map_or(value, |max| max.max(value)));
        }
        self.rows.insert(id, Arc::new(record));
    }

    pub(crate) fn update(&mut self, id: &Id, props: Props) {
        let Some(record) = self.rows.get_mut(id) else {
            return;
        };
        let record = Arc::make_mut(record);
        for (field, value) in props {
            record.insert(field, value);
        }
    }

    pub(crate) fn remove(&mut self, ids: &HashSet<Id>) {
        match ids.len() {
            0 => {}
            1 => {
                for id in ids {
                    self.rows.shift_remove(id);
                }
            }
            _ => self.rows.retain(|id, _| !ids.contains(id)),
        }
    }
}

impl Serialize for Table {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let items: Vec<&Id> = self.rows.keys().collect();
        let mut state = serializer.serialize_struct("Table", 2)?;
        state.serialize_field("items", &items)?;
        state.serialize_field("itemsById", &self.rows)?;
        state.end()
    }
}

/// Wire form of a table. Map keys are strings on the wire, so ids are
/// recovered from `items` and matched to keys by their display form.
#[derive(Deserialize)]
struct RawTable {
    items: Vec<Id>,
    #[serde(rename = "itemsById")]
    items_by_id: HashMap<String, Record>,
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let mut raw = RawTable::deserialize(deserializer)?;
        if raw.items.len() != raw.items_by_id.len() {
            return Err(D::Error::custom(format!(
                "table lists {} items but holds {} records",
                raw.items.len(),
                raw.items_by_id.len()
            )));
        }

        let mut table = Table::new();
        for id in raw.items {
            if table.contains(&id) {
                return Err(D::Error::custom(format!("duplicate id {id} in items")));
            }
            let Some(record) = raw.items_by_id.remove(&id.to_string()) else {
                return Err(D::Error::custom(format!("no record for id {id}")));
            };
            table.insert(id, record);
        }
        Ok(table)
    }
}
