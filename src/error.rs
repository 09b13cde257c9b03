//! Error types for the extraction pipeline
//!
//! Extraction gaps (no actor, no object, no predicate) are not errors; they
//! are `None` fields on the model. The types here cover malformed input,
//! failing collaborators and I/O.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;
use crate::nlp::validate::ValidationError;

/// Top-level error for processing one document.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid lexicon in {path}: {message}")]
    Lexicon { path: PathBuf, message: String },
}

/// Problems with a parsed document handed over by the NLP layer.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Malformed document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document validation failed:\n{}", format_issues(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
