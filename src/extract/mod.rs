//! Clause-level extraction
//!
//! Splits each sentence into clauses, extracts actor / action / object per
//! clause and runs the repair passes. `cleanup` runs later, once discourse
//! markers are known.

pub mod cleanup;
pub mod entity;
pub mod repair;
pub mod sentence;

pub use entity::Extractor;
pub use sentence::clause_spans;
