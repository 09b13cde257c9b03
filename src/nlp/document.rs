//! Immutable token arena
//!
//! A `ParsedDocument` owns every token record of one document. Entities in
//! the process model refer to tokens by `TokenIdx`, never by reference, so
//! the arena can be shared read-only across every pass.

use std::collections::HashMap;

use serde::Serialize;

use super::dto::{ConstituentDto, DocumentDto};
use super::validate::validate_document;
use crate::error::DocumentError;

/// Linear position of a token in its document.
pub type TokenIdx = usize;

/// Half-open token range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: TokenIdx,
    pub end: TokenIdx,
}

impl Span {
    pub fn new(start: TokenIdx, end: TokenIdx) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, i: TokenIdx) -> bool {
        self.start <= i && i < self.end
    }

    /// True if `i` lies strictly between the bounds.
    pub fn strictly_contains(&self, i: TokenIdx) -> bool {
        self.start < i && i < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> std::ops::Range<TokenIdx> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub i: TokenIdx,
    pub text: String,
    pub lemma: String,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    pub head: TokenIdx,
    pub whitespace: bool,
}

impl Token {
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn is_root(&self) -> bool {
        self.head == self.i
    }

    pub fn has_dep(&self, deps: &[&str]) -> bool {
        deps.contains(&self.dep.as_str())
    }
}

/// Constituency node with absolute token bounds.
#[derive(Debug, Clone)]
pub struct Constituent {
    pub span: Span,
    pub labels: Vec<String>,
    pub children: Vec<Constituent>,
}

impl Constituent {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    fn from_dto(dto: &ConstituentDto) -> Self {
        Self {
            span: Span::new(dto.start, dto.end),
            labels: dto.labels.clone(),
            children: dto.children.iter().map(Constituent::from_dto).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sentence {
    pub span: Span,
    pub parse: Option<Constituent>,
}

/// Parsed document: tokens, dependency tree, sentence segmentation,
/// constituency trees and coreference links.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    tokens: Vec<Token>,
    children: Vec<Vec<TokenIdx>>,
    depth: Vec<usize>,
    sentences: Vec<Sentence>,
    coreference: HashMap<TokenIdx, Vec<TokenIdx>>,
}

impl ParsedDocument {
    /// Validate and load a DTO. Every validation problem is reported at once.
    pub fn from_dto(dto: DocumentDto) -> Result<Self, DocumentError> {
        let issues = validate_document(&dto);
        if !issues.is_empty() {
            return Err(DocumentError::Invalid(issues));
        }

        let tokens: Vec<Token> = dto
            .tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| Token {
                i,
                text: t.text,
                lemma: t.lemma,
                pos: t.pos,
                tag: t.tag,
                dep: t.dep,
                head: t.head,
                whitespace: t.whitespace,
            })
            .collect();

        let mut children = vec![Vec::new(); tokens.len()];
        for token in &tokens {
            if !token.is_root() {
                children[token.head].push(token.i);
            }
        }

        // Validation guarantees every chain ends at a root.
        let depth = tokens
            .iter()
            .map(|t| {
                let mut d = 0;
                let mut current = t.i;
                while !tokens[current].is_root() {
                    current = tokens[current].head;
                    d += 1;
                }
                d
            })
            .collect();

        let sentences = dto
            .sentences
            .iter()
            .map(|s| Sentence {
                span: Span::new(s.start, s.end),
                parse: s.parse.as_ref().map(Constituent::from_dto),
            })
            .collect();

        let coreference = dto
            .coreference
            .into_iter()
            .filter(|c| !c.antecedents.is_empty())
            .map(|c| (c.mention, c.antecedents))
            .collect();

        Ok(Self {
            tokens,
            children,
            depth,
            sentences,
            coreference,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let dto: DocumentDto = serde_json::from_str(json)?;
        Self::from_dto(dto)
    }

    pub fn token(&self, i: TokenIdx) -> &Token {
        &self.tokens[i]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Direct dependency children in token order.
    pub fn children(&self, i: TokenIdx) -> &[TokenIdx] {
        &self.children[i]
    }

    /// Distance from `i` to its root.
    pub fn depth(&self, i: TokenIdx) -> usize {
        self.depth[i]
    }

    /// Antecedent tokens registered for a mention, if any.
    pub fn coreference(&self, i: TokenIdx) -> Option<&[TokenIdx]> {
        self.coreference.get(&i).map(|v| v.as_slice())
    }

    /// Surface text of a span, honoring the whitespace flags.
    pub fn text(&self, span: Span) -> String {
        let mut out = String::new();
        for i in span.indices() {
            let token = &self.tokens[i];
            out.push_str(&token.text);
            if token.whitespace && i + 1 < span.end {
                out.push(' ');
            }
        }
        out
    }
}
