use super::{AutoStrategy, Field, FieldTy, Relation};

use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model; also the name of its table
    pub name: String,

    /// The identifying attribute. Resolved to the registry default when the
    /// schema is built.
    pub id_attribute: Option<String>,

    /// Declared fields, in declaration order
    pub fields: IndexMap<String, Field>,

    /// How ids are assigned when `create` omits one
    pub auto: AutoStrategy,

    /// Every relation accessor on the model, forward and backward. Filled in
    /// when the schema is built.
    pub relations: IndexMap<String, Relation>,

    /// True for through models the registry created itself
    pub synthesized: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ModelId(pub usize);

impl Model {
    pub fn new(name: impl Into<String>) -> Model {
        Model {
            id: ModelId::placeholder(),
            name: name.into(),
            id_attribute: None,
            fields: IndexMap::new(),
            auto: AutoStrategy::default(),
            relations: IndexMap::new(),
            synthesized: false,
        }
    }

    /// Adds a field, replacing any earlier field of the same name.
    pub fn field(mut self, field: Field) -> Model {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Adds a plain attribute without a default.
    pub fn attr(self, name: impl Into<String>) -> Model {
        self.field(Field::attr(name))
    }

    pub fn with_id_attribute(mut self, name: impl Into<String>) -> Model {
        self.id_attribute = Some(name.into());
        self
    }

    pub fn with_auto(mut self, auto: AutoStrategy) -> Model {
        self.auto = auto;
        self
    }

    /// Name of the identifying attribute.
    pub fn id_attribute(&self) -> &str {
        self.id_attribute.as_deref().unwrap_or(super::DEFAULT_ID_ATTRIBUTE)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    /// Attribute fields, excluding relations.
    pub fn attrs(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.values().filter(|field| field.ty.is_attr())
    }

    /// The default function of the identifying attribute, if it declares one.
    pub fn id_default(&self) -> Option<&super::DefaultFn> {
        match &self.fields.get(self.id_attribute())?.ty {
            FieldTy::Attr(attr) => attr.default.as_ref(),
            _ => None,
        }
    }
}

impl ModelId {
    pub(crate) const fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
