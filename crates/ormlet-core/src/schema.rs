//! The model registry.
//!
//! Models are declared with [`Model`] and [`Field`], registered on a
//! [`Builder`] and linked into a [`Schema`]. Linking resolves the identifying
//! attribute of every model, synthesizes missing through models, and derives
//! the relation accessors of both sides of every relation.

mod auto;
pub use auto::AutoStrategy;

mod builder;
pub use builder::Builder;

mod field;
pub use field::{Attr, DefaultFn, Field, FieldTy, Fk, Many};

mod model;
pub use model::{Model, ModelId};

pub mod name;

mod relation;
pub use relation::{BelongsTo, HasMany, HasOne, ManyToMany, Relation};

use crate::db::Database;

use indexmap::IndexMap;

/// Identifying attribute used when neither the model nor the builder names one.
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

#[derive(Debug, Default)]
pub struct Schema {
    models: IndexMap<String, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Model> + '_ {
        self.models.values()
    }

    /// Get a model by ID
    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models
            .get_index(id.into().0)
            .map(|(_, model)| model)
            .expect("invalid model ID")
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// A snapshot with one empty table per model, synthesized through models
    /// included.
    pub fn empty_database(&self) -> Database {
        Database::with_tables(self.models.keys().map(String::as_str))
    }
}
