use crate::stmt::Id;

use std::fmt;
use std::sync::Arc;

/// How ormlet assigns the identifying attribute when `create` omits it
#[derive(Clone, Default)]
pub enum AutoStrategy {
    /// Next integer after the highest integer id the table has held
    #[default]
    Increment,

    /// Random v4 UUID, as a string
    Uuid,

    /// User function, called once per created record
    Custom(Arc<dyn Fn() -> Id + Send + Sync>),
}

impl AutoStrategy {
    pub fn custom(f: impl Fn() -> Id + Send + Sync + 'static) -> AutoStrategy {
        AutoStrategy::Custom(Arc::new(f))
    }

    /// Produces an id; `next_increment` is the table's next sequential id.
    ///
    /// Returns `None` only for `Increment` once sequential ids are used up.
    pub fn generate(&self, next_increment: Option<i64>) -> Option<Id> {
        match self {
            AutoStrategy::Increment => next_increment.map(Id::Int),
            AutoStrategy::Uuid => Some(Id::Str(uuid::Uuid::new_v4().to_string())),
            AutoStrategy::Custom(f) => Some(f()),
        }
    }
}

impl fmt::Debug for AutoStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoStrategy::Increment => f.write_str("Increment"),
            AutoStrategy::Uuid => f.write_str("Uuid"),
            AutoStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
