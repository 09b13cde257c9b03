//! Token-sequence templates for multi-word discourse markers
//! ("in the meantime", "in case of", "based on").

use serde::{Deserialize, Serialize};

use super::document::{ParsedDocument, Span, Token, TokenIdx};

/// Constraint on a single token. An empty constraint matches any token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSpec {
    /// Accepted lemmas, compared case-insensitively.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lemma: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    /// Zero or one occurrence.
    #[serde(default)]
    pub optional: bool,
}

impl TokenSpec {
    pub fn lemma(lemmas: &[&str]) -> Self {
        Self {
            lemma: lemmas.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn pos(pos: &str) -> Self {
        Self {
            pos: Some(pos.to_string()),
            ..Self::default()
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn accepts(&self, token: &Token) -> bool {
        let lemma_ok =
            self.lemma.is_empty() || self.lemma.iter().any(|l| l.eq_ignore_ascii_case(&token.lemma));
        let pos_ok = self.pos.as_ref().map_or(true, |p| *p == token.pos);
        lemma_ok && pos_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPattern {
    pub name: String,
    pub tokens: Vec<TokenSpec>,
}

impl TokenPattern {
    pub fn new(name: &str, tokens: Vec<TokenSpec>) -> Self {
        Self {
            name: name.to_string(),
            tokens,
        }
    }

    /// Every non-empty match inside `span`, ordered by start then end.
    pub fn find_matches(&self, doc: &ParsedDocument, span: Span) -> Vec<Span> {
        let mut out = Vec::new();
        for start in span.indices() {
            let mut ends = Vec::new();
            self.match_from(doc, span.end, 0, start, &mut ends);
            ends.sort_unstable();
            ends.dedup();
            out.extend(ends.into_iter().filter(|&e| e > start).map(|e| Span::new(start, e)));
        }
        out
    }

    pub fn matches(&self, doc: &ParsedDocument, span: Span) -> bool {
        !self.find_matches(doc, span).is_empty()
    }

    fn match_from(
        &self,
        doc: &ParsedDocument,
        limit: TokenIdx,
        spec_idx: usize,
        pos: TokenIdx,
        ends: &mut Vec<TokenIdx>,
    ) {
        let Some(spec) = self.tokens.get(spec_idx) else {
            ends.push(pos);
            return;
        };
        if spec.optional {
            self.match_from(doc, limit, spec_idx + 1, pos, ends);
        }
        if pos < limit && spec.accepts(doc.token(pos)) {
            self.match_from(doc, limit, spec_idx + 1, pos + 1, ends);
        }
    }
}

/// True if any pattern matches inside the span.
pub fn any_matches(patterns: &[TokenPattern], doc: &ParsedDocument, span: Span) -> bool {
    patterns.iter().any(|p| p.matches(doc, span))
}
