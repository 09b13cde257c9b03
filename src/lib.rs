//! text2bpmn: natural-language process descriptions to BPMN-style flows
//!
//! The crate consumes documents that an external NLP layer has already
//! tokenized, dependency-parsed, constituency-parsed and coreference-resolved,
//! and turns them into a lane-partitioned flow of activities and gateways.
//!
//! ## Architecture
//!
//! ```text
//! ParsedDocument → extract (actors, actions, objects per clause)
//!                → repair passes → markers → cleanup
//!                → flow builder → actor/lane resolver + end-activity detector
//!                → diagram description
//! ```
//!
//! The NLP engine, the lexical hierarchy and the LLM are injected
//! collaborators (`nlp::ParsedDocument`, `nlp::lexical::Lexicon`,
//! `llm::LlmClient`), so the extraction and flow logic is deterministic and
//! testable without a network.

pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod flow;
pub mod llm;
pub mod markers;
pub mod model;
pub mod nlp;
pub mod pipeline;
pub mod vocabulary;

pub use config::PipelineConfig;
pub use error::{DocumentError, PipelineError};
pub use pipeline::{Pipeline, ProcessModel};
