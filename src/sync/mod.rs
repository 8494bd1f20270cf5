//! Synchronization between the in-memory roster and the configuration store.

pub mod engine;

pub use engine::{RosterSnapshot, SyncEngine};
