//! Storage layer.
//!
//! Prompts, tags, and detected traits live in a single local vault behind
//! [`RecordStore`]. The `SQLite` backend also carries the full-text index
//! and computes the trait statistics the insight engine consumes.

// Dropping the connection guard a few lines early gains nothing.
#![allow(clippy::significant_drop_tightening)]

pub mod prompt;

pub use prompt::{RecordStore, SqliteRecordStore};
