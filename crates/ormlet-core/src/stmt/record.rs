use super::{Props, Value};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

static NULL: Value = Value::Null;

/// One row of a table: a mapping from field name to value.
///
/// Records are immutable once stored in a [`Table`](crate::db::Table); an
/// update produces a replacement record under the same id.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `field`, or `None` when the record lacks it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the value of `field`, reading a missing field as null.
    pub fn value(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns `true` if every assignment in `props` equals the record's value.
    pub fn matches(&self, props: &Props) -> bool {
        props
            .iter()
            .all(|(field, expected)| self.value(field) == expected)
    }

    /// Returns `true` if applying `props` would leave every read of the
    /// record unchanged. Assigning null to a missing field counts as no
    /// change, since both read as null.
    pub fn is_unchanged_by(&self, props: &Props) -> bool {
        props
            .iter()
            .all(|(field, value)| self.value(field) == value)
    }
}

impl From<Props> for Record {
    fn from(fields: Props) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
