use crate::schema::{Model, ModelId, Schema};

/// Records of `source` whose `field` holds the owner's id.
#[derive(Debug, Clone)]
pub struct HasMany {
    /// Model declaring the foreign key
    pub source: ModelId,

    /// The foreign key field on `source`
    pub field: String,
}

impl HasMany {
    pub fn source<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.source)
    }
}
