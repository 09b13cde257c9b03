//! Verb-side entity.

use serde::Serialize;

use super::entity::{Resource, Specifier, SpecifierType};
use super::process::Process;
use super::render::Phrase;
use crate::nlp::{ParsedDocument, TokenIdx};

/// Discourse role of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    If,
    Else,
    While,
    Then,
}

/// Jump reference to an already built gateway ("in the former case").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    ToPrev,
    ToNext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub token: TokenIdx,
    pub specifiers: Vec<Specifier>,
    pub object: Option<Resource>,
    pub prepositional_object: Option<Resource>,
    /// Sibling verbs coordinated with this one inside the same clause
    pub conjunctions: Vec<Action>,
    /// Particle of a phrasal verb ("pick *up*")
    pub prt: Option<TokenIdx>,
    pub aux: Option<TokenIdx>,
    pub advmods: Vec<TokenIdx>,
    pub dative: Option<TokenIdx>,
    pub prep: Option<TokenIdx>,
    pub negated: bool,
    pub active: bool,
    pub marker: Option<Marker>,
    pub link_type: Option<LinkType>,
    /// Embedded clause, e.g. the condition introduced by "that"
    pub subclause: Option<Box<Process>>,
}

impl Action {
    pub fn new(token: TokenIdx) -> Self {
        Self {
            token,
            specifiers: Vec::new(),
            object: None,
            prepositional_object: None,
            conjunctions: Vec::new(),
            prt: None,
            aux: None,
            advmods: Vec::new(),
            dative: None,
            prep: None,
            negated: false,
            active: false,
            marker: None,
            link_type: None,
            subclause: None,
        }
    }

    pub fn specifiers_of(&self, kind: SpecifierType) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter().filter(move |s| s.kind == kind)
    }

    /// Surface string: verb (inflected when active, lemma when passive),
    /// particle, complements, negation, object and prepositional object.
    pub fn text(&self, doc: &ParsedDocument) -> String {
        let verb = doc.token(self.token);
        let lemma = verb.lemma.as_str();
        let mut phrase = Phrase::new();

        if self.active {
            phrase.add_token(doc, self.token);
        } else {
            phrase.add_text_at(lemma, 0);
        }

        if let Some(prt) = self.prt {
            phrase.add_token(doc, prt);
        }

        if lemma != "be" {
            for spec in self.specifiers_of(SpecifierType::Acomp) {
                phrase.add_token(doc, spec.token);
            }
        }

        if self.negated {
            let slot = if self.active {
                phrase.position_of_token(self.token)
            } else {
                phrase.position_of_text(lemma)
            };
            if let Some(slot) = slot {
                if lemma == "be" || lemma == "have" {
                    phrase.insert_raw(slot + 1, "not");
                } else {
                    phrase.insert_raw(slot, "not");
                }
            }
        }

        if let Some(object) = &self.object {
            let is_pobj = self
                .prepositional_object
                .as_ref()
                .is_some_and(|p| p.token() == object.token());
            if !is_pobj {
                phrase.add_text_at(object.text(doc), object.token());
            }
        } else if lemma == "be" {
            for &child in doc.children(self.token) {
                match doc.token(child).dep.as_str() {
                    "acomp" => phrase.add_token(doc, child),
                    "attr" => {
                        phrase.add_token(doc, child);
                        for det in doc.children_with_dep(child, &["det", "amod", "compound"]) {
                            phrase.add_token(doc, det);
                        }
                    }
                    _ => {}
                }
            }
        }

        if let (Some(prep), Some(pobj)) = (self.prep, &self.prepositional_object) {
            let pobj_text = pobj.text(doc);
            if !pobj_text.is_empty() {
                phrase.add_token(doc, prep);
                phrase.add_text_at(pobj_text, pobj.token());
            }
        }

        phrase.render()
    }
}
