//! Linguistic accessor
//!
//! The NLP engine itself is external. This module holds the immutable arena
//! its output is loaded into, the traversal queries the extractor relies on,
//! the lexical-hierarchy port and the small token-pattern matcher used for
//! multi-word discourse markers.

pub mod builder;
pub mod document;
pub mod dto;
pub mod lexical;
pub mod pattern;
pub mod query;
pub mod text;
pub mod validate;

pub use document::{Constituent, ParsedDocument, Sentence, Span, Token, TokenIdx};
pub use lexical::{Lexicon, StaticLexicon};
