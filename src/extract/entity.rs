//! Actor / Resource / Action construction from head tokens.

use tracing::debug;

use crate::llm::{self, LlmClient, LlmError};
use crate::model::{Action, Actor, ExtractedObject, Resource, Specifier, SpecifierType};
use crate::nlp::lexical::{hypernym_chain_reaches, token_synsets, Lexicon};
use crate::nlp::{ParsedDocument, TokenIdx};
use crate::vocabulary::Vocabulary;

/// Dependency roles followed when assembling an actor's full name.
const NAME_DEPS: &[&str] = &[
    "compound", "det", "prep", "pobj", "appos", "amod", "nmod", "conj", "cc",
];

/// Builds entities for one document. Holds the read-only collaborators every
/// extraction step needs.
pub struct Extractor<'a> {
    pub doc: &'a ParsedDocument,
    pub lexicon: &'a dyn Lexicon,
    pub vocab: &'a Vocabulary,
    llm: Option<&'a dyn LlmClient>,
    llm_real_actor: bool,
}

impl<'a> Extractor<'a> {
    pub fn new(doc: &'a ParsedDocument, lexicon: &'a dyn Lexicon, vocab: &'a Vocabulary) -> Self {
        Self {
            doc,
            lexicon,
            vocab,
            llm: None,
            llm_real_actor: false,
        }
    }

    /// Consult `llm` when the lexical real-actor check fails.
    pub fn with_real_actor_llm(mut self, llm: &'a dyn LlmClient) -> Self {
        self.llm = Some(llm);
        self.llm_real_actor = true;
        self
    }

    pub fn create_actor(&self, token: TokenIdx) -> Result<Actor, LlmError> {
        let mut actor = Actor::new(token);
        actor.resolved = self.resolve(token);
        self.add_noun_specifiers(&mut actor.entity);

        let name_head = actor.resolved.first().copied().unwrap_or(token);
        let (full_name, name_tokens) = self.full_name(name_head);
        actor.full_name = full_name.trim().to_string();
        actor.name_tokens = name_tokens;
        actor.is_real_actor = self.is_real_actor(&actor.full_name, token)?;
        Ok(actor)
    }

    pub fn create_object(&self, token: TokenIdx) -> Resource {
        let mut resource = Resource::new(token);
        resource.resolved = self.resolve(token);
        self.add_noun_specifiers(&mut resource.entity);
        resource
    }

    pub fn create_action(&self, verb: TokenIdx, noun: Option<TokenIdx>) -> Action {
        let doc = self.doc;
        let mut action = Action::new(verb);
        action.object = noun.map(|n| self.create_object(n));
        action.aux = doc.first_child_with_dep(verb, &["aux"]);
        action.advmods = doc.children_with_dep(verb, &["advmod"]);
        action.negated = self.is_negated(verb, noun);
        action.prt = doc.first_child_with_dep(verb, &["prt"]);
        action.prepositional_object = self.find_pobj(verb).map(Resource::new);
        action.dative = doc.first_child_with_dep(verb, &["dative"]);

        for prep in doc.children_with_dep(verb, &["prep"]) {
            action
                .specifiers
                .push(Specifier::new(doc, prep, SpecifierType::Prep));
        }
        for acomp in doc.children_with_dep(verb, &["acomp"]) {
            action
                .specifiers
                .push(Specifier::new(doc, acomp, SpecifierType::Acomp));
        }
        action
    }

    /// Antecedents of a pronoun; empty for anything else.
    fn resolve(&self, token: TokenIdx) -> Vec<TokenIdx> {
        if self.vocab.is_pronoun(&self.doc.token(token).text) {
            self.doc.antecedents(token).to_vec()
        } else {
            Vec::new()
        }
    }

    fn add_noun_specifiers(&self, entity: &mut ExtractedObject) {
        let doc = self.doc;
        let head = entity.token;
        entity.determiner = doc.first_child_with_dep(head, &["det", "poss"]);
        entity.compounds = doc.descendants_with_dep(head, &["compound"]);
        for amod in doc.children_with_dep(head, &["amod"]) {
            entity
                .specifiers
                .push(Specifier::new(doc, amod, SpecifierType::Amod));
        }
        for nn in doc.children_with_dep(head, &["nn"]) {
            entity
                .specifiers
                .push(Specifier::new(doc, nn, SpecifierType::Nn));
        }
    }

    /// Lowercase name assembled from the head and its naming modifiers, in
    /// document order, with a leading article removed. Also returns the
    /// tokens the name was built from.
    pub fn full_name(&self, head: TokenIdx) -> (String, Vec<TokenIdx>) {
        let doc = self.doc;
        let mut tokens = vec![head];
        let mut stack = vec![head];
        while let Some(current) = stack.pop() {
            for &child in doc.children(current) {
                let t = doc.token(child);
                if t.has_dep(NAME_DEPS) && !self.vocab.is_name_excluded_preposition(&t.text) {
                    tokens.push(child);
                    stack.push(child);
                }
            }
        }
        tokens.sort_unstable();
        tokens.dedup();

        if let Some(&first) = tokens.first() {
            let t = doc.token(first);
            if t.dep == "det" && self.vocab.is_stripped_determiner(&t.text) {
                tokens.remove(0);
            }
        }

        let name = tokens
            .iter()
            .map(|&i| doc.token(i).lower())
            .collect::<Vec<_>>()
            .join(" ");
        (name, tokens)
    }

    /// Person, group or system check: override list, then pronoun
    /// exclusion, then the hypernym chain of the first sense, then the
    /// optional LLM fallback.
    pub fn is_real_actor(&self, full_name: &str, token: TokenIdx) -> Result<bool, LlmError> {
        if self.vocab.is_real_actor_override(full_name) {
            return Ok(true);
        }
        let t = self.doc.token(token);
        if self.vocab.is_pronoun(&t.text) || t.pos == "PRON" {
            return Ok(false);
        }

        let synsets = token_synsets(self.lexicon, t);
        let Some(first) = synsets.first() else {
            return Ok(false);
        };
        if hypernym_chain_reaches(self.lexicon, first, &self.vocab.real_actor_hypernyms) {
            return Ok(true);
        }

        match self.llm {
            Some(client) if self.llm_real_actor => {
                let verdict = llm::classify(client, &llm::prompts::real_actor(full_name))?;
                debug!(actor = full_name, verdict, "real-actor fallback");
                Ok(verdict)
            }
            _ => Ok(false),
        }
    }

    /// Direct prepositional object of the verb, else the object of its
    /// last object-introducing preposition.
    fn find_pobj(&self, verb: TokenIdx) -> Option<TokenIdx> {
        let doc = self.doc;
        let mut pobj = doc.children_with_dep(verb, &["pobj"]);
        if pobj.is_empty() {
            for prep in doc.children_with_dep(verb, &["prep"]) {
                if self.vocab.is_object_preposition(&doc.token(prep).text) {
                    pobj = doc.children_with_dep(prep, &["pobj"]);
                }
            }
        }
        pobj.first().copied()
    }

    fn is_negated(&self, verb: TokenIdx, noun: Option<TokenIdx>) -> bool {
        let doc = self.doc;
        if doc.first_child_with_dep(verb, &["neg"]).is_some() {
            return true;
        }
        noun.is_some_and(|n| {
            doc.children_with_dep(n, &["det"])
                .iter()
                .any(|&d| self.vocab.is_negation(&doc.token(d).text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedLlm;
    use crate::nlp::builder::DocumentBuilder;
    use crate::nlp::StaticLexicon;
    use proptest::prelude::*;

    // "The senior clerk of the registry sends no reply to the customer ."
    fn doc() -> ParsedDocument {
        DocumentBuilder::new()
            .sentence(
                &[
                    ("The", "the", "DET", "det", 2),
                    ("senior", "senior", "ADJ", "amod", 2),
                    ("clerk", "clerk", "NOUN", "nsubj", 6),
                    ("of", "of", "ADP", "prep", 2),
                    ("the", "the", "DET", "det", 5),
                    ("registry", "registry", "NOUN", "pobj", 3),
                    ("sends", "send", "VERB", "ROOT", 6),
                    ("no", "no", "DET", "det", 8),
                    ("reply", "reply", "NOUN", "dobj", 6),
                    ("to", "to", "ADP", "prep", 6),
                    ("the", "the", "DET", "det", 11),
                    ("customer", "customer", "NOUN", "pobj", 9),
                    (".", ".", "PUNCT", "punct", 6),
                ],
                None,
            )
            .build()
            .unwrap()
    }

    fn lexicon() -> StaticLexicon {
        let mut lex = StaticLexicon::new();
        lex.add_chain("clerk", &["clerk.n.01", "worker.n.01", "person.n.01"]);
        lex.add_chain("reply", &["reply.n.01", "statement.n.01", "message.n.01"]);
        lex
    }

    #[test]
    fn test_full_name_stops_at_excluded_preposition() {
        let d = doc();
        let lex = lexicon();
        let vocab = Vocabulary::default();
        let ex = Extractor::new(&d, &lex, &vocab);
        let (name, tokens) = ex.full_name(2);
        assert_eq!(name, "senior clerk");
        assert_eq!(tokens, vec![1, 2]);
    }

    #[test]
    fn test_create_actor_real() {
        let d = doc();
        let lex = lexicon();
        let vocab = Vocabulary::default();
        let actor = Extractor::new(&d, &lex, &vocab).create_actor(2).unwrap();
        assert_eq!(actor.full_name, "senior clerk");
        assert!(actor.is_real_actor);
        assert_eq!(actor.entity.determiner, Some(0));
        assert_eq!(actor.entity.specifiers.len(), 1);
    }

    #[test]
    fn test_override_list_wins() {
        let d = doc();
        let lex = StaticLexicon::new();
        let vocab = Vocabulary::default();
        let ex = Extractor::new(&d, &lex, &vocab);
        assert!(ex.is_real_actor("registry", 5).unwrap());
        assert!(!ex.is_real_actor("customer", 11).unwrap());
    }

    #[test]
    fn test_llm_fallback_consulted_only_after_lexicon() {
        let d = doc();
        let lex = lexicon();
        let vocab = Vocabulary::default();
        let llm = ScriptedLlm::new(vec!["True"]);
        let ex = Extractor::new(&d, &lex, &vocab).with_real_actor_llm(&llm);
        // reply has synsets but no person hypernym
        assert!(ex.is_real_actor("reply", 8).unwrap());
        assert_eq!(llm.prompts().len(), 1);
        // clerk is settled by the lexicon
        assert!(ex.is_real_actor("clerk", 2).unwrap());
        assert_eq!(llm.prompts().len(), 1);
    }

    #[test]
    fn test_create_action_fields() {
        let d = doc();
        let lex = lexicon();
        let vocab = Vocabulary::default();
        let action = Extractor::new(&d, &lex, &vocab).create_action(6, Some(8));
        assert!(action.negated);
        assert_eq!(action.object.as_ref().map(|o| o.token()), Some(8));
        assert_eq!(
            action.prepositional_object.as_ref().map(|o| o.token()),
            Some(11)
        );
        assert_eq!(action.specifiers_of(SpecifierType::Prep).count(), 1);
    }

    proptest! {
        #[test]
        fn prop_full_name_never_starts_with_article(
            det in prop::sample::select(vec!["the", "a", "an", "The", "An", "this"]),
            adjectives in prop::collection::vec(prop::sample::select(vec!["new", "senior", "chief"]), 0..3),
        ) {
            let mut rows: Vec<(&str, &str, &str, &str, usize)> = Vec::new();
            let head = adjectives.len() + 1;
            rows.push((det, det, "DET", "det", head));
            for adj in &adjectives {
                rows.push((adj, adj, "ADJ", "amod", head));
            }
            rows.push(("clerk", "clerk", "NOUN", "ROOT", head));
            let d = DocumentBuilder::new().sentence(&rows, None).build().unwrap();
            let lex = StaticLexicon::new();
            let vocab = Vocabulary::default();
            let ex = Extractor::new(&d, &lex, &vocab);

            let (first, _) = ex.full_name(head);
            let (second, _) = ex.full_name(head);
            prop_assert_eq!(&first, &second);
            for article in ["the ", "a ", "an "] {
                prop_assert!(!first.starts_with(article));
            }
        }
    }
}
