use serde::{Deserialize, Serialize};

// ── Helper defaults for serde ──

fn default_true() -> bool {
    true
}

// ── Top-level DTO ──

/// Wire format of a parsed document as produced by the NLP front-end.
///
/// Token heads are absolute indices into `tokens`; a root token is its own
/// head. Sentence and constituent bounds are half-open token ranges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentDto {
    pub tokens: Vec<TokenDto>,
    pub sentences: Vec<SentenceDto>,
    #[serde(default)]
    pub coreference: Vec<CorefDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDto {
    pub text: String,
    pub lemma: String,
    /// Coarse universal part of speech (NOUN, VERB, AUX, PRON, ADP, ...).
    pub pos: String,
    /// Fine-grained tag, if the parser provides one.
    #[serde(default)]
    pub tag: String,
    /// Dependency label (nsubj, dobj, auxpass, mark, ...).
    pub dep: String,
    pub head: usize,
    /// Whether the token is followed by whitespace in the source text.
    #[serde(default = "default_true")]
    pub whitespace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceDto {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<ConstituentDto>,
}

/// One node of a constituency tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstituentDto {
    #[serde(default)]
    pub labels: Vec<String>,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConstituentDto>,
}

impl ConstituentDto {
    pub fn new(labels: &[&str], start: usize, end: usize) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            start,
            end,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ConstituentDto>) -> Self {
        self.children = children;
        self
    }

    pub(crate) fn shifted(&self, offset: usize) -> Self {
        Self {
            labels: self.labels.clone(),
            start: self.start + offset,
            end: self.end + offset,
            children: self.children.iter().map(|c| c.shifted(offset)).collect(),
        }
    }
}

/// A pronoun and the antecedent tokens it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorefDto {
    pub mention: usize,
    pub antecedents: Vec<usize>,
}
