//! Snapshot storage and the update engine.
//!
//! A [`Database`] maps model names to [`Table`]s, each held behind an `Arc`.
//! Writes go through [`Update`]: it is validated against a snapshot first and
//! then committed by cloning only the tables and records it touches.

mod database;
pub use database::Database;

mod table;
pub use table::Table;

mod update;
pub use update::{Op, Prepared, Update};
