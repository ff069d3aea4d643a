mod builder;
pub use builder::Builder;

use crate::Session;

use ormlet_core::{Database, Schema};

use std::sync::Arc;

/// The registry of models, and the factory for sessions over snapshots of it.
#[derive(Debug, Clone)]
pub struct Orm {
    schema: Arc<Schema>,
}

impl Orm {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// A snapshot with an empty table for every model.
    pub fn empty_state(&self) -> Arc<Database> {
        Arc::new(self.schema.empty_database())
    }

    /// Opens a copy-on-write session: writes branch `state` into new
    /// snapshots and never touch `state` itself.
    pub fn session(&self, state: Arc<Database>) -> Session {
        Session::new(self.schema.clone(), state, false)
    }

    /// Opens a session that writes into `state` in place.
    ///
    /// The resulting snapshot is the same allocation as `state` as long as the
    /// session holds the only handle to it. Tables or records still shared
    /// with another snapshot are cloned before being written.
    pub fn mutable_session(&self, state: Arc<Database>) -> Session {
        Session::new(self.schema.clone(), state, true)
    }
}
