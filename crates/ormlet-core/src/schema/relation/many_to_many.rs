use crate::schema::{Model, ModelId, Schema};

/// One side of a many-to-many field.
///
/// Each link is a record of `through` holding the owner's id in `own_field`
/// and the target's id in `other_field`. The backward side of a field is the
/// forward side with the two fields swapped.
#[derive(Debug, Clone)]
pub struct ManyToMany {
    pub target: ModelId,

    pub through: ModelId,

    pub own_field: String,

    pub other_field: String,

    /// True on the model that declares the field
    pub forward: bool,
}

impl ManyToMany {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    pub fn through<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.through)
    }
}
