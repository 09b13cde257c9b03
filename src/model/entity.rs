//! Noun-side entities: actors and resources.

use serde::Serialize;

use super::render::Phrase;
use crate::nlp::{ParsedDocument, TokenIdx};

/// Kind of modifier attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierType {
    /// Adjectival modifier ("the *red* car")
    Amod,
    /// Noun-noun modifier ("*coffee* mug")
    Nn,
    /// Prepositional modifier of a verb
    Prep,
    /// Adjectival complement of a verb ("is *fast*")
    Acomp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specifier {
    pub token: TokenIdx,
    pub kind: SpecifierType,
    /// Lowercase surface text
    pub name: String,
}

impl Specifier {
    pub fn new(doc: &ParsedDocument, token: TokenIdx, kind: SpecifierType) -> Self {
        Self {
            token,
            kind,
            name: doc.token(token).lower(),
        }
    }
}

/// Fields shared by everything extracted around a head token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedObject {
    pub token: TokenIdx,
    pub determiner: Option<TokenIdx>,
    pub compounds: Vec<TokenIdx>,
    pub specifiers: Vec<Specifier>,
}

impl ExtractedObject {
    pub fn new(token: TokenIdx) -> Self {
        Self {
            token,
            determiner: None,
            compounds: Vec::new(),
            specifiers: Vec::new(),
        }
    }

    pub fn specifiers_of(&self, kind: SpecifierType) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter().filter(move |s| s.kind == kind)
    }
}

/// Render a noun phrase: every descendant except relative clauses, clausal
/// modifiers and punctuation, then the head itself or, when resolved, the
/// comma-joined antecedents in the head's position.
fn noun_phrase_text(doc: &ParsedDocument, head: TokenIdx, resolved: &[TokenIdx]) -> String {
    let mut phrase = Phrase::new();
    collect_descendants(doc, head, &mut phrase);
    if resolved.is_empty() {
        phrase.add_token(doc, head);
    } else {
        let antecedents = resolved
            .iter()
            .map(|&r| doc.token(r).text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        phrase.add_text_at(antecedents, head);
    }
    phrase.render()
}

fn collect_descendants(doc: &ParsedDocument, token: TokenIdx, phrase: &mut Phrase) {
    for &child in doc.children(token) {
        if doc.token(child).has_dep(&["relcl", "punct", "acl"]) {
            continue;
        }
        collect_descendants(doc, child, phrase);
        phrase.add_token(doc, child);
    }
}

/// Grammatical or logical subject performing an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    #[serde(flatten)]
    pub entity: ExtractedObject,
    /// Assembled lowercase name without a leading article
    pub full_name: String,
    /// Tokens the name was assembled from
    pub name_tokens: Vec<TokenIdx>,
    /// Antecedents when the head is a resolved pronoun
    pub resolved: Vec<TokenIdx>,
    pub is_real_actor: bool,
}

impl Actor {
    pub fn new(token: TokenIdx) -> Self {
        Self {
            entity: ExtractedObject::new(token),
            full_name: String::new(),
            name_tokens: Vec::new(),
            resolved: Vec::new(),
            is_real_actor: true,
        }
    }

    pub fn token(&self) -> TokenIdx {
        self.entity.token
    }

    pub fn text(&self, doc: &ParsedDocument) -> String {
        noun_phrase_text(doc, self.entity.token, &self.resolved)
    }
}

/// Object of an action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(flatten)]
    pub entity: ExtractedObject,
    pub resolved: Vec<TokenIdx>,
}

impl Resource {
    pub fn new(token: TokenIdx) -> Self {
        Self {
            entity: ExtractedObject::new(token),
            resolved: Vec::new(),
        }
    }

    pub fn token(&self) -> TokenIdx {
        self.entity.token
    }

    pub fn text(&self, doc: &ParsedDocument) -> String {
        noun_phrase_text(doc, self.entity.token, &self.resolved)
    }
}

/// The entity a clause is "about": the actor in active voice, the object in
/// passive voice.
#[derive(Debug, Clone, Copy)]
pub enum Participant<'a> {
    Actor(&'a Actor),
    Resource(&'a Resource),
}

impl Participant<'_> {
    pub fn token(&self) -> TokenIdx {
        match self {
            Participant::Actor(a) => a.token(),
            Participant::Resource(r) => r.token(),
        }
    }

    /// Same head text, or two actors with the same full name.
    pub fn same_referent(&self, other: &Participant<'_>, doc: &ParsedDocument) -> bool {
        if doc.token(self.token()).lower() == doc.token(other.token()).lower() {
            return true;
        }
        match (self, other) {
            (Participant::Actor(a), Participant::Actor(b)) => a.full_name == b.full_name,
            _ => false,
        }
    }
}
