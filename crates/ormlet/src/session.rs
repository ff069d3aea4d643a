use crate::Model;

use ormlet_core::db::{Table, Update};
use ormlet_core::{schema, Database, Result, Schema};

use indexmap::IndexSet;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// A unit of work over one snapshot.
///
/// Reads see every write made through the session so far. Writes replace
/// only the tables and records they touch; everything else stays shared with
/// the snapshot the session was opened on.
pub struct Session {
    schema: Arc<Schema>,

    /// The current snapshot
    state: RefCell<Arc<Database>>,

    /// The input snapshot, held by copy-on-write sessions so that the first
    /// write always branches away from it.
    base: Option<Arc<Database>>,

    /// Models with committed edits
    touched: RefCell<IndexSet<String>>,
}

impl Session {
    pub(crate) fn new(schema: Arc<Schema>, state: Arc<Database>, mutable: bool) -> Session {
        tracing::debug!(mutable, tables = state.len(), "session opened");

        Session {
            schema,
            base: (!mutable).then(|| state.clone()),
            state: RefCell::new(state),
            touched: RefCell::new(IndexSet::new()),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The accessor for the model named `name`.
    ///
    /// # Panics
    ///
    /// Panics if no such model is registered.
    #[track_caller]
    pub fn model(&self, name: &str) -> Model<'_> {
        match self.try_model(name) {
            Some(model) => model,
            None => panic!("model `{name}` is not registered"),
        }
    }

    pub fn try_model(&self, name: &str) -> Option<Model<'_>> {
        let model = self.schema.model_by_name(name)?;
        Some(Model::new(self, model))
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<Database> {
        self.state.borrow().clone()
    }

    /// The snapshot a copy-on-write session was opened on.
    pub fn base(&self) -> Option<&Arc<Database>> {
        self.base.as_ref()
    }

    pub fn is_mutable(&self) -> bool {
        self.base.is_none()
    }

    /// Names of the models this session has written to, in first-write order.
    pub fn touched(&self) -> Vec<String> {
        self.touched.borrow().iter().cloned().collect()
    }

    /// Ends the session, handing back the current snapshot.
    pub fn into_state(self) -> Arc<Database> {
        self.state.into_inner()
    }

    /// The current table of `model`. A snapshot missing the table reads as
    /// empty.
    pub(crate) fn table(&self, model: &schema::Model) -> Arc<Table> {
        self.state
            .borrow()
            .table(&model.name)
            .cloned()
            .unwrap_or_default()
    }

    /// Validates `update` against the current snapshot and commits it.
    ///
    /// Nothing is written when validation fails or when the update would not
    /// change the snapshot.
    pub(crate) fn apply(&self, update: Update) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let prepared = update.prepare(&state)?;
        if prepared.is_empty() {
            return Ok(());
        }

        self.touched
            .borrow_mut()
            .extend(prepared.tables().map(str::to_string));
        Arc::make_mut(&mut state).commit(prepared);
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mutable", &self.is_mutable())
            .field("touched", &self.touched.borrow())
            .finish_non_exhaustive()
    }
}
