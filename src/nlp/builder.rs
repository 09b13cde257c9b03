//! Programmatic construction of parsed documents.
//!
//! Used by tests and by callers that drive an in-process parser instead of
//! handing over JSON. Heads and constituent bounds are given relative to the
//! sentence being added.

use super::document::{ParsedDocument, TokenIdx};
use super::dto::{ConstituentDto, CorefDto, DocumentDto, SentenceDto, TokenDto};
use crate::error::DocumentError;

/// `(text, lemma, pos, dep, head)` with `head` relative to the sentence start.
pub type TokenRow<'a> = (&'a str, &'a str, &'a str, &'a str, usize);

#[derive(Debug, Default)]
pub struct DocumentBuilder {
    dto: DocumentDto,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sentence. Returns the builder for chaining.
    pub fn sentence(mut self, rows: &[TokenRow<'_>], parse: Option<ConstituentDto>) -> Self {
        let offset = self.dto.tokens.len();
        for (n, &(text, lemma, pos, dep, head)) in rows.iter().enumerate() {
            let next_is_punct = rows.get(n + 1).is_some_and(|r| r.2 == "PUNCT");
            self.dto.tokens.push(TokenDto {
                text: text.to_string(),
                lemma: lemma.to_string(),
                pos: pos.to_string(),
                tag: String::new(),
                dep: dep.to_string(),
                head: head + offset,
                whitespace: !next_is_punct,
            });
        }
        self.dto.sentences.push(SentenceDto {
            start: offset,
            end: offset + rows.len(),
            parse: parse.map(|p| p.shifted(offset)),
        });
        self
    }

    /// Register antecedents for a mention (absolute indices).
    pub fn coreference(mut self, mention: TokenIdx, antecedents: &[TokenIdx]) -> Self {
        self.dto.coreference.push(CorefDto {
            mention,
            antecedents: antecedents.to_vec(),
        });
        self
    }

    pub fn into_dto(self) -> DocumentDto {
        self.dto
    }

    pub fn build(self) -> Result<ParsedDocument, DocumentError> {
        ParsedDocument::from_dto(self.dto)
    }
}
