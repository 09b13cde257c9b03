//! Process model
//!
//! Entities extracted from clauses. Everything refers to the parsed document
//! by token index; surface strings are rendered on demand against the
//! document.

pub mod action;
pub mod entity;
pub mod process;
pub mod render;

pub use action::{Action, LinkType, Marker};
pub use entity::{Actor, ExtractedObject, Participant, Resource, Specifier, SpecifierType};
pub use process::{Process, SentenceContainer};
