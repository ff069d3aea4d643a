use crate::schema::{Model, ModelId, Schema};

#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Referenced model
    pub target: ModelId,

    /// Field on the owning model that stores the target id
    pub field: String,

    /// True for one-to-one foreign keys
    pub unique: bool,
}

impl BelongsTo {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }
}
