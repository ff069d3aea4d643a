use crate::schema::{Model, ModelId, Schema};

/// The record of `source` whose unique `field` holds the owner's id.
#[derive(Debug, Clone)]
pub struct HasOne {
    /// Model declaring the foreign key
    pub source: ModelId,

    /// The foreign key field on `source`
    pub field: String,
}

impl HasOne {
    pub fn source<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.source)
    }
}
