//! Data models for roster input and reconciled records.
//!
//! - `Person`, `RawCompletion`: the untrusted roster as it is read from disk
//! - `CompletionRecord`: the single most recent valid completion kept for a
//!   (person, training) pair

pub mod person;
pub mod record;

pub use person::{Person, RawCompletion};
pub use record::{CompletionRecord, RecordKey};
