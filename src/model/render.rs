//! Position-ordered phrase assembly.
//!
//! Surface strings are built from a mix of document tokens and literal text.
//! Tokens are kept in document order; a literal inserted "at" a position is
//! placed before the first token that follows that position. Literals are
//! never used as ordering anchors.

use crate::nlp::{ParsedDocument, TokenIdx};

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Token(TokenIdx, String),
    Text(String),
}

#[derive(Debug, Default)]
pub struct Phrase {
    pieces: Vec<Piece>,
}

impl Phrase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Add a token at its own document position.
    pub fn add_token(&mut self, doc: &ParsedDocument, i: TokenIdx) {
        let piece = Piece::Token(i, doc.token(i).lower());
        self.insert_at(piece, i);
    }

    /// Add literal text ordered as if it stood at position `i`.
    pub fn add_text_at(&mut self, text: impl Into<String>, i: TokenIdx) {
        self.insert_at(Piece::Text(text.into()), i);
    }

    /// Slot of a token already in the phrase.
    pub fn position_of_token(&self, i: TokenIdx) -> Option<usize> {
        self.pieces
            .iter()
            .position(|p| matches!(p, Piece::Token(t, _) if *t == i))
    }

    /// Slot of a literal already in the phrase.
    pub fn position_of_text(&self, text: &str) -> Option<usize> {
        self.pieces
            .iter()
            .position(|p| matches!(p, Piece::Text(s) if s == text))
    }

    /// Insert literal text at a raw slot, bypassing position ordering.
    pub fn insert_raw(&mut self, slot: usize, text: &str) {
        let slot = slot.min(self.pieces.len());
        self.pieces.insert(slot, Piece::Text(text.to_string()));
    }

    fn insert_at(&mut self, piece: Piece, i: TokenIdx) {
        let slot = self
            .pieces
            .iter()
            .position(|p| matches!(p, Piece::Token(t, _) if i < *t));
        match slot {
            Some(s) => self.pieces.insert(s, piece),
            None => self.pieces.push(piece),
        }
    }

    pub fn render(&self) -> String {
        self.pieces
            .iter()
            .map(|p| match p {
                Piece::Token(_, s) | Piece::Text(s) => s.as_str(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
