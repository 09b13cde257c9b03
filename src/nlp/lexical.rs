//! Lexical hierarchy port
//!
//! The extractor only needs three questions answered about a word: which
//! senses (synsets) it has, the hypernyms of a sense and the lemma names of
//! a sense. `Lexicon` is that port; `StaticLexicon` is an in-memory synset
//! graph loaded from YAML or JSON.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::document::Token;
use crate::error::PipelineError;

/// WordNet word class, encoded as the second segment of a synset id
/// (`person.n.01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordClass {
    /// Map a coarse universal POS tag to a word class.
    pub fn from_pos(pos: &str) -> Option<Self> {
        match pos {
            "NOUN" | "PROPN" => Some(Self::Noun),
            "VERB" | "AUX" => Some(Self::Verb),
            "ADJ" => Some(Self::Adjective),
            "ADV" => Some(Self::Adverb),
            _ => None,
        }
    }

    /// Word class of a synset id, if it carries one.
    pub fn of_synset(id: &str) -> Option<Self> {
        match id.split('.').nth(1)? {
            "n" => Some(Self::Noun),
            "v" => Some(Self::Verb),
            "a" | "s" => Some(Self::Adjective),
            "r" => Some(Self::Adverb),
            _ => None,
        }
    }
}

pub trait Lexicon {
    /// Senses of a word, most frequent first.
    fn synsets(&self, word: &str, class: Option<WordClass>) -> Vec<String>;
    /// Direct hypernyms of a sense, most relevant first.
    fn hypernyms(&self, synset: &str) -> Vec<String>;
    fn lemma_names(&self, synset: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynsetEntry {
    #[serde(default)]
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub hypernyms: Vec<String>,
}

/// In-memory lexical hierarchy.
///
/// ```yaml
/// synsets:
///   clerk.n.01: { lemmas: [clerk], hypernyms: [worker.n.01] }
///   worker.n.01: { lemmas: [worker], hypernyms: [person.n.01] }
/// words:
///   clerk: [clerk.n.01]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticLexicon {
    #[serde(default)]
    synsets: HashMap<String, SynsetEntry>,
    #[serde(default)]
    words: HashMap<String, Vec<String>>,
}

impl StaticLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a YAML file. JSON is accepted as well since it is valid YAML.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|e| PipelineError::Lexicon {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn insert_synset(&mut self, id: &str, lemmas: &[&str], hypernyms: &[&str]) {
        self.synsets.insert(
            id.to_string(),
            SynsetEntry {
                lemmas: lemmas.iter().map(|s| s.to_string()).collect(),
                hypernyms: hypernyms.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    pub fn insert_word(&mut self, word: &str, synsets: &[&str]) {
        self.words
            .entry(word.to_lowercase())
            .or_default()
            .extend(synsets.iter().map(|s| s.to_string()));
    }

    /// Register `word` with a single sense whose first-hypernym chain is
    /// `chain` (first element is the word's own sense). Lemma names are
    /// taken from the id prefix. Existing synsets keep their entries.
    pub fn add_chain(&mut self, word: &str, chain: &[&str]) -> &mut Self {
        if let Some(first) = chain.first() {
            self.insert_word(word, &[first]);
        }
        for (n, id) in chain.iter().enumerate() {
            let entry = self.synsets.entry(id.to_string()).or_default();
            if entry.lemmas.is_empty() {
                entry.lemmas.push(id.split('.').next().unwrap_or(id).to_string());
            }
            if let Some(next) = chain.get(n + 1) {
                if !entry.hypernyms.iter().any(|h| h == next) {
                    entry.hypernyms.push(next.to_string());
                }
            }
        }
        self
    }

    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }
}

impl Lexicon for StaticLexicon {
    fn synsets(&self, word: &str, class: Option<WordClass>) -> Vec<String> {
        self.words
            .get(&word.to_lowercase())
            .map(|ids| {
                ids.iter()
                    .filter(|id| class.is_none() || WordClass::of_synset(id) == class)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn hypernyms(&self, synset: &str) -> Vec<String> {
        self.synsets
            .get(synset)
            .map(|s| s.hypernyms.clone())
            .unwrap_or_default()
    }

    fn lemma_names(&self, synset: &str) -> Vec<String> {
        self.synsets
            .get(synset)
            .map(|s| s.lemmas.clone())
            .unwrap_or_default()
    }
}

// ── Hypernym walkers ──

fn normalize_lemma(name: &str) -> String {
    name.replace('_', " ").to_lowercase()
}

/// Senses of a token: its surface text first, then its lemma, filtered by
/// the word class of its part of speech.
pub fn token_synsets(lexicon: &dyn Lexicon, token: &Token) -> Vec<String> {
    let class = WordClass::from_pos(&token.pos);
    let mut out = lexicon.synsets(&token.text, class);
    if !token.lemma.eq_ignore_ascii_case(&token.text) {
        for id in lexicon.synsets(&token.lemma, class) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}

/// Follow the first hypernym of each sense upward and report whether the
/// first lemma name of any visited hypernym is in `targets`. Each synset is
/// visited at most once per walk, so cyclic hierarchies terminate.
pub fn hypernym_chain_reaches(lexicon: &dyn Lexicon, synset: &str, targets: &[String]) -> bool {
    let targets: Vec<String> = targets.iter().map(|t| normalize_lemma(t)).collect();
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = synset.to_string();

    loop {
        if !visited.insert(current.clone()) {
            return false;
        }
        let Some(parent) = lexicon.hypernyms(&current).into_iter().next() else {
            return false;
        };
        let reached = lexicon
            .lemma_names(&parent)
            .first()
            .is_some_and(|name| targets.contains(&normalize_lemma(name)));
        if reached {
            return true;
        }
        current = parent;
    }
}

/// True if the token's text is in the stop list or the hierarchy of its
/// first sense reaches it.
pub fn hypernyms_checker(lexicon: &dyn Lexicon, token: &Token, stop_list: &[String]) -> bool {
    if stop_list.contains(&token.lower()) {
        return true;
    }
    token_synsets(lexicon, token)
        .first()
        .is_some_and(|s| hypernym_chain_reaches(lexicon, s, stop_list))
}

/// Like `hypernyms_checker` but any sense may reach the stop list.
pub fn verb_hypernyms_checker(lexicon: &dyn Lexicon, token: &Token, stop_list: &[String]) -> bool {
    if stop_list.contains(&token.lower()) {
        return true;
    }
    token_synsets(lexicon, token)
        .iter()
        .any(|s| hypernym_chain_reaches(lexicon, s, stop_list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn token(text: &str, pos: &str) -> Token {
        Token {
            i: 0,
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: pos.to_string(),
            tag: String::new(),
            dep: "ROOT".to_string(),
            head: 0,
            whitespace: true,
        }
    }

    fn targets(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_chain_reaches_person() {
        let mut lex = StaticLexicon::new();
        lex.add_chain("clerk", &["clerk.n.01", "worker.n.01", "person.n.01"]);
        let clerk = token("clerk", "NOUN");
        assert!(hypernyms_checker(&lex, &clerk, &targets(&["person"])));
        assert!(!hypernyms_checker(&lex, &clerk, &targets(&["event"])));
    }

    #[test]
    fn test_underscore_lemmas_match_spaces() {
        let mut lex = StaticLexicon::new();
        lex.add_chain("team", &["team.n.01", "social_group.n.01"]);
        let team = token("team", "NOUN");
        assert!(hypernyms_checker(&lex, &team, &targets(&["social group"])));
    }

    #[test]
    fn test_stop_list_matches_text() {
        let lex = StaticLexicon::new();
        assert!(hypernyms_checker(&lex, &token("End", "VERB"), &targets(&["end"])));
    }

    #[test]
    fn test_word_class_filter() {
        let mut lex = StaticLexicon::new();
        lex.insert_word("end", &["end.n.01", "end.v.01"]);
        assert_eq!(lex.synsets("end", Some(WordClass::Verb)), vec!["end.v.01"]);
        assert_eq!(lex.synsets("end", None).len(), 2);
    }

    #[test]
    fn test_verb_checker_tries_every_sense() {
        let mut lex = StaticLexicon::new();
        lex.insert_word("finish", &["finish.v.01", "finish.v.02"]);
        lex.insert_synset("finish.v.01", &["finish"], &["coat.v.01"]);
        lex.insert_synset("coat.v.01", &["coat"], &[]);
        lex.insert_synset("finish.v.02", &["finish"], &["end.v.01"]);
        lex.insert_synset("end.v.01", &["end"], &[]);
        let finish = token("finish", "VERB");
        assert!(!hypernyms_checker(&lex, &finish, &targets(&["end"])));
        assert!(verb_hypernyms_checker(&lex, &finish, &targets(&["end"])));
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        let mut lex = StaticLexicon::new();
        lex.insert_word("loop", &["a.n.01"]);
        lex.insert_synset("a.n.01", &["a"], &["b.n.01"]);
        lex.insert_synset("b.n.01", &["b"], &["a.n.01"]);
        assert!(!hypernyms_checker(&lex, &token("loop", "NOUN"), &targets(&["person"])));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
synsets:
  clerk.n.01: { lemmas: [clerk], hypernyms: [person.n.01] }
  person.n.01: { lemmas: [person] }
words:
  clerk: [clerk.n.01]
"#;
        let lex = StaticLexicon::from_yaml(yaml).unwrap();
        assert_eq!(lex.synset_count(), 2);
        assert!(hypernym_chain_reaches(&lex, "clerk.n.01", &targets(&["person"])));
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = StaticLexicon::load(Path::new("/nonexistent/lexicon.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lexicon.yaml"));
    }

    proptest! {
        #[test]
        fn prop_walk_terminates_on_any_graph(edges in proptest::collection::vec(0usize..8, 8)) {
            let mut lex = StaticLexicon::new();
            for (n, &parent) in edges.iter().enumerate() {
                let id = format!("s{}.n.01", n);
                let lemma = format!("s{}", n);
                let hyper = format!("s{}.n.01", parent);
                lex.insert_synset(&id, &[lemma.as_str()], &[hyper.as_str()]);
            }
            let reached = hypernym_chain_reaches(&lex, "s0.n.01", &targets(&["nowhere"]));
            prop_assert!(!reached);
        }
    }
}
