//! Pipeline configuration
//!
//! Defines the serde schema for the pipeline YAML file. Every field has a
//! default, so an empty file (or no file) yields the built-in behavior.
//! The configuration is read once and stays fixed for the whole run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PipelineError;
use crate::vocabulary::Vocabulary;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub features: FeatureFlags,
    pub similarity: SimilarityConfig,
    pub diagram: DiagramConfig,
    pub llm: LlmConfig,
    pub vocabulary: Vocabulary,
}

/// Switches for optional behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Ask the LLM when the lexical real-actor check fails
    pub llm_real_actor: bool,

    /// Merge near-duplicate actor names
    pub actor_similarity: bool,

    /// Ask the LLM whether branch activities end the process
    pub refine_end_activities: bool,

    /// Let the LLM polish the emitted diagram syntax
    pub improve_syntax: bool,

    /// Place the first node in the lane of the first activity with a known
    /// actor, instead of always using the first lane
    pub resolve_first_lane: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            llm_real_actor: false,
            actor_similarity: false,
            refine_end_activities: false,
            improve_syntax: false,
            resolve_first_lane: true,
        }
    }
}

impl FeatureFlags {
    /// True if any enabled feature needs an LLM client.
    pub fn needs_llm(&self) -> bool {
        self.llm_real_actor || self.refine_end_activities || self.improve_syntax
    }
}

/// Thresholds for actor name merging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Minimum Sørensen-Dice score of the two names
    pub lexical_threshold: f64,
    /// Minimum ratio of shared content-word lemmas
    pub lemma_overlap_threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            lexical_threshold: 0.5,
            lemma_overlap_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub width: u32,
    pub theme: String,
    /// Characters after which a gateway condition label wraps
    pub condition_wrap: usize,
    /// Phrases removed from activity labels
    pub label_fillers: Vec<String>,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            width: 10000,
            theme: "BLUEMOUNTAIN".to_string(),
            condition_wrap: 15,
            label_fillers: vec![
                "the first activity ".to_string(),
                "the second activity ".to_string(),
                ": ".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.1,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from YAML string (for testing)
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }
}
