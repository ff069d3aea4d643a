use crate::stmt::Value;

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name, unique within its model
    pub name: String,

    /// Plain attribute or relation declaration
    pub ty: FieldTy,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    /// A plain value
    Attr(Attr),

    /// Holds the id of one `target` record
    Fk(Fk),

    /// A set of `target` records, linked through a through model
    Many(Many),
}

#[derive(Debug, Clone, Default)]
pub struct Attr {
    /// Fills the field when `create` omits it
    pub default: Option<DefaultFn>,
}

/// Zero-argument function producing a field's default value.
#[derive(Clone)]
pub struct DefaultFn(Arc<dyn Fn() -> Value + Send + Sync>);

#[derive(Debug, Clone)]
pub struct Fk {
    /// Name of the referenced model
    pub target: String,

    /// Backward accessor installed on the target
    pub related_name: Option<String>,

    /// One-to-one: the backward accessor yields a single record
    pub unique: bool,
}

#[derive(Debug, Clone)]
pub struct Many {
    /// Name of the referenced model
    pub target: String,

    /// Backward accessor installed on the target
    pub related_name: Option<String>,

    /// Name of the model storing the links. Synthesized when not given.
    pub through: Option<String>,

    /// The two foreign keys of `through` that carry the links
    pub through_fields: Option<[String; 2]>,
}

impl Field {
    pub fn attr(name: impl Into<String>) -> Field {
        Field {
            name: name.into(),
            ty: FieldTy::Attr(Attr::default()),
        }
    }

    pub fn fk(name: impl Into<String>, target: impl Into<String>) -> Field {
        Field {
            name: name.into(),
            ty: FieldTy::Fk(Fk {
                target: target.into(),
                related_name: None,
                unique: false,
            }),
        }
    }

    pub fn one_to_one(name: impl Into<String>, target: impl Into<String>) -> Field {
        let mut field = Field::fk(name, target);
        field.ty.expect_fk_mut().unique = true;
        field
    }

    pub fn many(name: impl Into<String>, target: impl Into<String>) -> Field {
        Field {
            name: name.into(),
            ty: FieldTy::Many(Many {
                target: target.into(),
                related_name: None,
                through: None,
                through_fields: None,
            }),
        }
    }

    /// Sets a constant default for an attribute.
    #[track_caller]
    pub fn default_value(self, value: impl Into<Value>) -> Field {
        let value = value.into();
        self.default_with(move || value.clone())
    }

    /// Sets a default function for an attribute.
    #[track_caller]
    pub fn default_with(mut self, f: impl Fn() -> Value + Send + Sync + 'static) -> Field {
        self.ty.expect_attr_mut().default = Some(DefaultFn(Arc::new(f)));
        self
    }

    /// Names the backward accessor of a relation.
    #[track_caller]
    pub fn related_name(mut self, name: impl Into<String>) -> Field {
        let name = Some(name.into());
        match &mut self.ty {
            FieldTy::Fk(fk) => fk.related_name = name,
            FieldTy::Many(many) => many.related_name = name,
            FieldTy::Attr(_) => panic!("expected relation field, but `{}` is an attribute", self.name),
        }
        self
    }

    #[track_caller]
    pub fn through(mut self, model: impl Into<String>) -> Field {
        self.ty.expect_many_mut().through = Some(model.into());
        self
    }

    #[track_caller]
    pub fn through_fields(mut self, first: impl Into<String>, second: impl Into<String>) -> Field {
        self.ty.expect_many_mut().through_fields = Some([first.into(), second.into()]);
        self
    }

    pub fn is_relation(&self) -> bool {
        !self.ty.is_attr()
    }

    /// Name of the related model, for relation fields.
    pub fn target(&self) -> Option<&str> {
        match &self.ty {
            FieldTy::Attr(_) => None,
            FieldTy::Fk(fk) => Some(&fk.target),
            FieldTy::Many(many) => Some(&many.target),
        }
    }
}

impl FieldTy {
    pub fn is_attr(&self) -> bool {
        matches!(self, Self::Attr(..))
    }

    pub fn as_attr(&self) -> Option<&Attr> {
        match self {
            Self::Attr(attr) => Some(attr),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_attr_mut(&mut self) -> &mut Attr {
        match self {
            Self::Attr(attr) => attr,
            _ => panic!("expected attribute field, but was {self:?}"),
        }
    }

    pub fn is_fk(&self) -> bool {
        matches!(self, Self::Fk(..))
    }

    pub fn as_fk(&self) -> Option<&Fk> {
        match self {
            Self::Fk(fk) => Some(fk),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_fk_mut(&mut self) -> &mut Fk {
        match self {
            Self::Fk(fk) => fk,
            _ => panic!("expected field to be `Fk`, but was {self:?}"),
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(..))
    }

    pub fn as_many(&self) -> Option<&Many> {
        match self {
            Self::Many(many) => Some(many),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_many_mut(&mut self) -> &mut Many {
        match self {
            Self::Many(many) => many,
            _ => panic!("expected field to be `Many`, but was {self:?}"),
        }
    }
}

impl DefaultFn {
    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for DefaultFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultFn(..)")
    }
}
