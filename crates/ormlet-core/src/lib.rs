pub mod db;
pub use db::Database;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

pub type Result<T, E = Error> = core::result::Result<T, E>;
