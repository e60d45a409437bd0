//! Core types and trait definitions for the snapmap record store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate in the workspace depends on it.

pub mod record;
pub mod store;

pub use record::{
  CollapseReport, DuplicateGroup, LocationCount, NewRecord, Record, RecordPatch,
  RecordQuery, SNAP_TERMS, StoreStats, UpdateOutcome,
};
pub use store::RecordStore;
