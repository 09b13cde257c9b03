//! Discourse markers
//!
//! Assigns if / else / while / then roles to actions from single-word
//! markers, multi-word templates and "former / latter case" jump references.
//! A "that" complement clause is folded into the process that governs it.

use tracing::debug;

use crate::model::{LinkType, Marker, SentenceContainer};
use crate::nlp::pattern::any_matches;
use crate::nlp::{ParsedDocument, TokenIdx};
use crate::vocabulary::Vocabulary;

/// Run all marker passes over one container.
pub fn determine_markers(doc: &ParsedDocument, vocab: &Vocabulary, container: &mut SentenceContainer) {
    single_markers(doc, vocab, container);
    compound_markers(doc, vocab, container);
    jump_markers(doc, vocab, container);
}

fn marker_for_mark(vocab: &Vocabulary, word: &str) -> Option<Marker> {
    if vocab.is_if(word) {
        Some(Marker::If)
    } else if vocab.is_else(word) {
        Some(Marker::Else)
    } else {
        None
    }
}

fn marker_for_advmod(vocab: &Vocabulary, word: &str) -> Option<Marker> {
    if vocab.is_parallel(word) {
        Some(Marker::While)
    } else if vocab.is_if(word) {
        Some(Marker::If)
    } else if vocab.is_else(word) {
        Some(Marker::Else)
    } else if vocab.is_sequence(word) {
        Some(Marker::Then)
    } else {
        None
    }
}

/// Verb a marker attaches to; particles defer to their own head.
fn marked_verb(doc: &ParsedDocument, marker: TokenIdx) -> Option<TokenIdx> {
    let verb = doc.head(marker)?;
    if doc.token(verb).pos == "PART" {
        doc.head(verb)
    } else {
        Some(verb)
    }
}

pub fn single_markers(doc: &ParsedDocument, vocab: &Vocabulary, container: &mut SentenceContainer) {
    for mark in doc.span_dependents(container.span, &["mark"]) {
        let Some(verb) = marked_verb(doc, mark) else {
            continue;
        };
        let Some(pos) = container.position_of_action(verb) else {
            continue;
        };
        let word = doc.token(mark).lower();

        if let Some(marker) = marker_for_mark(vocab, &word) {
            if let Some(action) = container.processes[pos].action.as_mut() {
                action.marker = Some(marker);
            }
        } else if word == "that" && doc.token(verb).dep == "ccomp" {
            fold_subclause(doc, container, pos, verb);
        }
    }

    for advmod in doc.span_dependents(container.span, &["advmod"]) {
        let Some(verb) = doc.head(advmod) else {
            continue;
        };
        let Some(pos) = container.position_of_action(verb) else {
            continue;
        };
        if let Some(marker) = marker_for_advmod(vocab, &doc.token(advmod).lower()) {
            if let Some(action) = container.processes[pos].action.as_mut() {
                action.marker = Some(marker);
            }
        }
    }

    for prep in doc.span_dependents(container.span, &["prep"]) {
        let Some(verb) = doc.head(prep) else {
            continue;
        };
        if let Some(pos) = container.position_of_action(verb) {
            if let Some(action) = container.processes[pos].action.as_mut() {
                action.prep = Some(prep);
            }
        }
    }
}

/// Remove the complement clause at `pos` and attach it to the process of
/// the verb that governs it.
fn fold_subclause(doc: &ParsedDocument, container: &mut SentenceContainer, pos: usize, verb: TokenIdx) {
    let Some(main_verb) = doc.head(verb) else {
        return;
    };
    if container.position_of_action(main_verb).is_none() {
        return;
    }
    let sub = container.processes.remove(pos);
    if let Some(main) = container.position_of_action(main_verb) {
        if let Some(action) = container.processes[main].action.as_mut() {
            debug!(main_verb, verb, "folded complement clause");
            action.subclause = Some(Box::new(sub));
        }
    }
}

/// Multi-word markers for processes no single word has marked.
pub fn compound_markers(doc: &ParsedDocument, vocab: &Vocabulary, container: &mut SentenceContainer) {
    for process in &mut container.processes {
        let span = process.span;
        let Some(action) = process.action.as_mut() else {
            continue;
        };
        if action.marker.is_some() {
            continue;
        }
        action.marker = if any_matches(&vocab.conditional_patterns, doc, span) {
            Some(Marker::If)
        } else if any_matches(&vocab.parallel_patterns, doc, span) {
            Some(Marker::While)
        } else if any_matches(&vocab.sequence_patterns, doc, span) {
            Some(Marker::Then)
        } else {
            None
        };
    }
}

/// "In the former case" links back to the first branch of the last
/// gateway, "in the latter case" to the second.
pub fn jump_markers(doc: &ParsedDocument, vocab: &Vocabulary, container: &mut SentenceContainer) {
    for process in &mut container.processes {
        let span = process.span;
        let Some(action) = process.action.as_mut() else {
            continue;
        };
        for pattern in &vocab.case_patterns {
            for found in pattern.find_matches(doc, span) {
                let text = doc.text(found).to_lowercase();
                if text.contains("former") {
                    action.link_type = Some(LinkType::ToPrev);
                } else if text.contains("latter") {
                    action.link_type = Some(LinkType::ToNext);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;
    use crate::nlp::builder::DocumentBuilder;
    use crate::nlp::StaticLexicon;

    fn analyze(d: &ParsedDocument) -> SentenceContainer {
        let lex = StaticLexicon::new();
        let vocab = Vocabulary::default();
        let mut c = Extractor::new(d, &lex, &vocab)
            .analyze_document()
            .unwrap()
            .remove(0);
        determine_markers(d, &vocab, &mut c);
        c
    }

    #[test]
    fn test_advmod_otherwise_is_else() {
        // "Otherwise , the clerk cancels the order ."
        let d = DocumentBuilder::new()
            .sentence(
                &[
                    ("Otherwise", "otherwise", "ADV", "advmod", 4),
                    (",", ",", "PUNCT", "punct", 4),
                    ("the", "the", "DET", "det", 3),
                    ("clerk", "clerk", "NOUN", "nsubj", 4),
                    ("cancels", "cancel", "VERB", "ROOT", 4),
                    ("the", "the", "DET", "det", 6),
                    ("order", "order", "NOUN", "dobj", 4),
                    (".", ".", "PUNCT", "punct", 4),
                ],
                None,
            )
            .build()
            .unwrap();
        let c = analyze(&d);
        assert_eq!(c.processes[0].marker(), Some(Marker::Else));
    }

    #[test]
    fn test_meantime_is_while() {
        // "In the meantime the clerk files the form ."
        let d = DocumentBuilder::new()
            .sentence(
                &[
                    ("In", "in", "ADP", "prep", 5),
                    ("the", "the", "DET", "det", 2),
                    ("meantime", "meantime", "NOUN", "pobj", 0),
                    ("the", "the", "DET", "det", 4),
                    ("clerk", "clerk", "NOUN", "nsubj", 5),
                    ("files", "file", "VERB", "ROOT", 5),
                    ("the", "the", "DET", "det", 7),
                    ("form", "form", "NOUN", "dobj", 5),
                    (".", ".", "PUNCT", "punct", 5),
                ],
                None,
            )
            .build()
            .unwrap();
        let c = analyze(&d);
        let action = c.processes[0].action.as_ref().unwrap();
        assert_eq!(action.marker, Some(Marker::While));
        assert_eq!(action.prep, Some(0));
    }

    #[test]
    fn test_latter_case_links_forward() {
        // "In the latter case the clerk calls the customer ."
        let d = DocumentBuilder::new()
            .sentence(
                &[
                    ("In", "in", "ADP", "prep", 6),
                    ("the", "the", "DET", "det", 3),
                    ("latter", "latter", "ADJ", "amod", 3),
                    ("case", "case", "NOUN", "pobj", 0),
                    ("the", "the", "DET", "det", 5),
                    ("clerk", "clerk", "NOUN", "nsubj", 6),
                    ("calls", "call", "VERB", "ROOT", 6),
                    ("the", "the", "DET", "det", 8),
                    ("customer", "customer", "NOUN", "dobj", 6),
                    (".", ".", "PUNCT", "punct", 6),
                ],
                None,
            )
            .build()
            .unwrap();
        let c = analyze(&d);
        let action = c.processes[0].action.as_ref().unwrap();
        assert_eq!(action.link_type, Some(LinkType::ToNext));
        assert_eq!(action.marker, None);
        assert_eq!(action.prep, Some(0));
    }

    #[test]
    fn test_that_clause_folded_into_governor() {
        // "The clerk checks that the form is complete ."
        let d = DocumentBuilder::new()
            .sentence(
                &[
                    ("The", "the", "DET", "det", 1),
                    ("clerk", "clerk", "NOUN", "nsubj", 2),
                    ("checks", "check", "VERB", "ROOT", 2),
                    ("that", "that", "SCONJ", "mark", 6),
                    ("the", "the", "DET", "det", 5),
                    ("form", "form", "NOUN", "nsubj", 6),
                    ("is", "be", "AUX", "ccomp", 2),
                    ("complete", "complete", "ADJ", "acomp", 6),
                    (".", ".", "PUNCT", "punct", 2),
                ],
                Some(
                    crate::nlp::dto::ConstituentDto::new(&["S"], 0, 9).with_children(vec![
                        crate::nlp::dto::ConstituentDto::new(&["SBAR"], 3, 8),
                    ]),
                ),
            )
            .build()
            .unwrap();
        let c = analyze(&d);
        assert_eq!(c.processes.len(), 1);
        let action = c.processes[0].action.as_ref().unwrap();
        assert_eq!(action.token, 2);
        let sub = action.subclause.as_ref().unwrap();
        assert_eq!(sub.action_token(), Some(6));
    }
}
