use super::Value;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A record identifier.
///
/// Ids are opaque at the storage layer: integers and strings are both valid,
/// and an id never changes for the lifetime of its record.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl Id {
    /// Returns the id held by `value`, if the value is an integer or string.
    pub fn from_value(value: &Value) -> Option<Id> {
        match value {
            Value::I64(v) => Some(Id::Int(*v)),
            Value::String(v) => Some(Id::Str(v.clone())),
            _ => None,
        }
    }

    /// The id of the other kind that displays the same way, e.g. `"7"` for
    /// `7`. Snapshots key records by display form, so the two cannot share a
    /// table.
    pub fn display_twin(&self) -> Option<Id> {
        match self {
            Id::Int(v) => Some(Id::Str(v.to_string())),
            Id::Str(v) => v
                .parse::<i64>()
                .ok()
                .filter(|parsed| parsed.to_string() == *v)
                .map(Id::Int),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Id::Int(v) => Some(*v),
            Id::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Id::Str(v) => Some(v),
            Id::Int(_) => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(v) => write!(f, "{v}"),
            Id::Str(v) => f.write_str(v),
        }
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(v) => write!(f, "{v}"),
            Id::Str(v) => write!(f, "{v:?}"),
        }
    }
}


impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Int(value)
    }
}

impl From<i32> for Id {
    fn from(value: i32) -> Self {
        Id::Int(value.into())
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Id::Int(value.into())
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Str(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Str(value)
    }
}

impl From<&Id> for Id {
    fn from(value: &Id) -> Self {
        value.clone()
    }
}
