//! Real-actor collection and near-duplicate merging.
//!
//! Two stage check for near duplicates:
//! 1. strsim (Sørensen-Dice) on the full names
//! 2. content-word lemma overlap
//!
//! Both scores must reach their threshold before a later actor is renamed to
//! the name registered first.

use std::collections::HashSet;

use tracing::debug;

use crate::config::SimilarityConfig;
use crate::model::SentenceContainer;
use crate::nlp::{ParsedDocument, TokenIdx};
use crate::vocabulary::Vocabulary;

struct RegisteredActor {
    name: String,
    lemmas: HashSet<String>,
}

/// Lowercase lemmas of the name tokens, without stopwords and punctuation.
fn content_lemmas(doc: &ParsedDocument, vocab: &Vocabulary, tokens: &[TokenIdx]) -> HashSet<String> {
    tokens
        .iter()
        .map(|&i| doc.token(i))
        .filter(|t| t.pos != "PUNCT" && !vocab.is_stopword(&t.text))
        .map(|t| t.lemma.to_lowercase())
        .collect()
}

/// Shared lemmas over the average content-word count of the two names.
pub fn lemma_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let average = (a.len() + b.len()) as f64 / 2.0;
    if average == 0.0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / average
}

/// Full names of all real actors, first occurrence order, no duplicates.
pub fn valid_actors(containers: &[SentenceContainer]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for actor in containers
        .iter()
        .flat_map(|c| c.processes.iter())
        .filter_map(|p| p.actor.as_ref())
        .filter(|a| a.is_real_actor)
    {
        if !names.contains(&actor.full_name) {
            names.push(actor.full_name.clone());
        }
    }
    names
}

/// Rename near-duplicate real actors to the first matching registered name,
/// in document order. Returns the registered names.
pub fn merge_similar_actors(
    doc: &ParsedDocument,
    vocab: &Vocabulary,
    config: &SimilarityConfig,
    containers: &mut [SentenceContainer],
) -> Vec<String> {
    let mut registered: Vec<RegisteredActor> = Vec::new();

    for actor in containers
        .iter_mut()
        .flat_map(|c| c.processes.iter_mut())
        .filter_map(|p| p.actor.as_mut())
        .filter(|a| a.is_real_actor)
    {
        if registered.iter().any(|r| r.name == actor.full_name) {
            continue;
        }
        let lemmas = content_lemmas(doc, vocab, &actor.name_tokens);
        let matched = registered.iter().find(|r| {
            let lexical = strsim::sorensen_dice(&r.name, &actor.full_name);
            lexical >= config.lexical_threshold
                && lemma_overlap(&r.lemmas, &lemmas) >= config.lemma_overlap_threshold
        });
        match matched {
            Some(r) => {
                debug!(from = %actor.full_name, to = %r.name, "merged similar actor");
                actor.full_name = r.name.clone();
            }
            None => registered.push(RegisteredActor {
                name: actor.full_name.clone(),
                lemmas,
            }),
        }
    }
    registered.into_iter().map(|r| r.name).collect()
}

/// Drop every name contained in another, longer name.
pub fn adjust_actor_list(names: &[String]) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .filter(|(n, name)| {
            !names
                .iter()
                .enumerate()
                .any(|(m, other)| m != *n && other != *name && other.contains(name.as_str()))
        })
        .map(|(_, name)| name.clone())
        .collect()
}
