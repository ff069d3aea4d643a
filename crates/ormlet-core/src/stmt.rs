//! Values stored in records.

mod id;
pub use id::Id;

mod record;
pub use record::Record;

mod value;
pub use value::Value;

use indexmap::IndexMap;

/// Field assignments passed to create and update operations.
///
/// Keys are field or relation names; insertion order is preserved.
pub type Props = IndexMap<String, Value>;
