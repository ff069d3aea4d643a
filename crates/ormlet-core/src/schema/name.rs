//! Names the registry derives when a declaration leaves them out.

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Name of the through model synthesized for `model.field`, e.g. `BookGenres`.
pub fn through_model(model: &str, field: &str) -> String {
    format!("{model}{}", field.to_upper_camel_case())
}

/// Foreign key on a synthesized through model pointing at the declaring model.
pub fn from_field(model: &str) -> String {
    format!("from_{}_id", model.to_snake_case())
}

/// Foreign key on a synthesized through model pointing at the target model.
pub fn to_field(model: &str) -> String {
    format!("to_{}_id", model.to_snake_case())
}

/// Backward accessor for a `fk` or `many` relation declared on `model`.
pub fn related_set(model: &str) -> String {
    format!("{}_set", model.to_snake_case())
}

/// Backward accessor for a one-to-one relation declared on `model`.
pub fn related_one(model: &str) -> String {
    model.to_snake_case()
}
