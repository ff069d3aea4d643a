mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

mod has_one;
pub use has_one::HasOne;

mod many_to_many;
pub use many_to_many::ManyToMany;

use super::ModelId;

/// A relation accessor on a model.
#[derive(Debug, Clone)]
pub enum Relation {
    /// Forward side of a foreign key
    BelongsTo(BelongsTo),

    /// Backward side of a foreign key
    HasMany(HasMany),

    /// Backward side of a one-to-one foreign key
    HasOne(HasOne),

    /// Either side of a many-to-many field
    ManyToMany(ManyToMany),
}

impl Relation {
    /// The model this accessor yields records of.
    pub fn target(&self) -> ModelId {
        match self {
            Relation::BelongsTo(rel) => rel.target,
            Relation::HasMany(rel) => rel.source,
            Relation::HasOne(rel) => rel.source,
            Relation::ManyToMany(rel) => rel.target,
        }
    }

    /// True when the accessor yields a set of records.
    pub fn is_many(&self) -> bool {
        matches!(self, Relation::HasMany(..) | Relation::ManyToMany(..))
    }

    /// True when the accessor is declared as a field of its own model.
    pub fn is_forward(&self) -> bool {
        match self {
            Relation::BelongsTo(_) => true,
            Relation::ManyToMany(rel) => rel.forward,
            Relation::HasMany(_) | Relation::HasOne(_) => false,
        }
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match self {
            Relation::BelongsTo(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn as_many_to_many(&self) -> Option<&ManyToMany> {
        match self {
            Relation::ManyToMany(rel) => Some(rel),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_many_to_many(&self) -> &ManyToMany {
        match self {
            Relation::ManyToMany(rel) => rel,
            _ => panic!("expected relation to be `ManyToMany`, but was {self:?}"),
        }
    }
}
