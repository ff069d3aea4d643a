mod instance;
pub use instance::Instance;

mod model;
pub use model::Model;

pub mod orm;
pub use orm::Orm;

mod planner;

pub mod query_set;
pub use query_set::{Direction, QuerySet};

pub mod relation;
pub use relation::Related;

mod session;
pub use session::Session;

pub use ormlet_core::{db, schema, stmt, Error, Result};

/// Builds [`stmt::Props`] from `key => value` pairs.
///
/// ```
/// let props = ormlet::props! { "name" => "Dune", "genres" => vec![0, 1] };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::stmt::Props::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut props = $crate::stmt::Props::new();
        $(
            props.insert(::std::string::String::from($key), $crate::stmt::Value::from($value));
        )+
        props
    }};
}
