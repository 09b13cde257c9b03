//! Per-container repair passes run right after extraction.

use tracing::debug;

use super::entity::Extractor;
use crate::llm::LlmError;
use crate::model::{Process, Resource, SentenceContainer};
use crate::nlp::{ParsedDocument, TokenIdx};

/// Nearest `xcomp` governor reached through `conj` links only.
fn xcomp_governor(doc: &ParsedDocument, verb: TokenIdx) -> Option<TokenIdx> {
    let mut current = verb;
    loop {
        let token = doc.token(current);
        match token.dep.as_str() {
            "xcomp" => return doc.head(current),
            "conj" => current = doc.head(current)?,
            _ => return None,
        }
    }
}

/// Fill missing actors from the governing clause and replace relative
/// pronoun actors with the noun they modify.
pub fn complement_actor(ex: &Extractor<'_>, container: &mut SentenceContainer) -> Result<(), LlmError> {
    let doc = ex.doc;
    for n in 0..container.processes.len() {
        let Some(verb) = container.processes[n].action_token() else {
            continue;
        };

        match &container.processes[n].actor {
            None => {
                if let Some(governor) = xcomp_governor(doc, verb) {
                    let inherited = container
                        .position_of_action(governor)
                        .and_then(|pos| container.processes[pos].actor.clone());
                    if inherited.is_some() {
                        container.processes[n].actor = inherited;
                    }
                } else if doc.token(verb).has_dep(&["ccomp", "acl"]) {
                    if let Some(actor_token) = clausal_actor(doc, verb) {
                        container.processes[n].actor = Some(ex.create_actor(actor_token)?);
                    }
                }
            }
            Some(actor) => {
                let pronoun = doc.token(actor.token()).pos == "PRON";
                if pronoun && doc.token(verb).dep == "relcl" {
                    if let Some(noun) = doc.head(verb) {
                        debug!(verb, noun, "relative pronoun actor replaced");
                        container.processes[n].actor = Some(ex.create_actor(noun)?);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Dative or prepositional object of the verb governing a clausal
/// complement ("asks the clerk to ..."). A noun governor is skipped over.
fn clausal_actor(doc: &ParsedDocument, verb: TokenIdx) -> Option<TokenIdx> {
    let mut governor = doc.head(verb)?;
    if doc.token(governor).pos == "NOUN" {
        governor = doc.head(governor)?;
    }
    let dependent = doc.first_child_with_dep(governor, &["dative", "prep"])?;
    match doc.token(dependent).pos.as_str() {
        "NOUN" => Some(dependent),
        "ADP" => doc.first_child_with_dep(dependent, &["pobj"]),
        _ => None,
    }
}

/// Replace relative pronoun objects with the noun the clause modifies.
pub fn complement_object(doc: &ParsedDocument, container: &mut SentenceContainer) {
    for process in &mut container.processes {
        let Some(action) = process.action.as_mut() else {
            continue;
        };
        let Some(object) = &action.object else {
            continue;
        };
        if doc.token(object.token()).pos == "PRON" && doc.token(action.token).dep == "relcl" {
            if let Some(noun) = doc.head(action.token) {
                action.object = Some(Resource::new(noun));
            }
        }
    }
}

/// Drop processes with neither actor nor action. When the clause root hangs
/// off a verb that owns another process, that process takes the dropped
/// one's position.
pub fn correct_model(doc: &ParsedDocument, container: &mut SentenceContainer) {
    while let Some(invalid) = container.processes.iter().position(Process::is_invalid) {
        let owner = doc
            .span_root(container.processes[invalid].span)
            .and_then(|root| doc.head(root))
            .filter(|&h| doc.token(h).pos == "AUX" || doc.token(h).pos == "VERB")
            .and_then(|h| container.position_of_action(h));

        match owner {
            Some(owner) => {
                container.processes.swap(owner, invalid);
                container.processes.remove(owner);
            }
            None => {
                container.processes.remove(invalid);
            }
        }
    }
}

/// Promote each action's conjunctions to processes of their own, next to
/// the host and in token order. A host without an object borrows one from
/// its conjuncts; conjuncts without one borrow the host's.
pub fn complement_model(container: &mut SentenceContainer) {
    let hosts: Vec<usize> = container
        .processes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.action.as_ref().is_some_and(|a| !a.conjunctions.is_empty()))
        .map(|(n, _)| n)
        .collect();

    let mut inserted = 0;
    for original in hosts {
        let mut host_pos = original + inserted;
        let conjunctions = match &container.processes[host_pos].action {
            Some(action) => action.conjunctions.clone(),
            None => continue,
        };
        let host_verb = container.processes[host_pos].action_token().unwrap_or_default();

        if let Some(host_action) = container.processes[host_pos].action.as_mut() {
            if host_action.object.is_none() {
                host_action.object = conjunctions.iter().find_map(|c| c.object.clone());
            }
        }
        let shared_object = container.processes[host_pos]
            .action
            .as_ref()
            .and_then(|a| a.object.clone());

        let mut cursor = host_pos as isize;
        for mut conj in conjunctions {
            if conj.object.is_none() {
                conj.object = shared_object.clone();
            }
            let host = &container.processes[host_pos];

            if conj.token < host_verb {
                cursor -= 1;
            }
            let slot = (cursor + 1).max(0) as usize;
            let promoted = Process {
                span: host.span,
                actor: host.actor.clone(),
                action: Some(conj),
            };
            container.processes.insert(slot, promoted);
            if slot <= host_pos {
                host_pos += 1;
            }
            cursor += 1;
            inserted += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Action;
    use crate::nlp::builder::DocumentBuilder;
    use crate::nlp::{Span, StaticLexicon};
    use crate::vocabulary::Vocabulary;
    use proptest::prelude::*;

    // "The clerk checks , signs and files the form ."
    fn conj_doc() -> ParsedDocument {
        DocumentBuilder::new()
            .sentence(
                &[
                    ("The", "the", "DET", "det", 1),
                    ("clerk", "clerk", "NOUN", "nsubj", 2),
                    ("checks", "check", "VERB", "ROOT", 2),
                    (",", ",", "PUNCT", "punct", 2),
                    ("signs", "sign", "VERB", "conj", 2),
                    ("and", "and", "CCONJ", "cc", 4),
                    ("files", "file", "VERB", "conj", 4),
                    ("the", "the", "DET", "det", 8),
                    ("form", "form", "NOUN", "dobj", 6),
                    (".", ".", "PUNCT", "punct", 2),
                ],
                None,
            )
            .build()
            .unwrap()
    }

    // "The clerk who signs the form leaves ."
    fn relcl_doc() -> ParsedDocument {
        DocumentBuilder::new()
            .sentence(
                &[
                    ("The", "the", "DET", "det", 1),
                    ("clerk", "clerk", "NOUN", "nsubj", 6),
                    ("who", "who", "PRON", "nsubj", 3),
                    ("signs", "sign", "VERB", "relcl", 1),
                    ("the", "the", "DET", "det", 5),
                    ("form", "form", "NOUN", "dobj", 3),
                    ("leaves", "leave", "VERB", "ROOT", 6),
                    (".", ".", "PUNCT", "punct", 6),
                ],
                None,
            )
            .build()
            .unwrap()
    }

    fn analyze(d: &ParsedDocument) -> SentenceContainer {
        let lex = StaticLexicon::new();
        let vocab = Vocabulary::default();
        Extractor::new(d, &lex, &vocab)
            .analyze_document()
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_conjuncts_promoted_in_order_with_shared_object() {
        let d = conj_doc();
        let c = analyze(&d);
        let verbs: Vec<_> = c.processes.iter().filter_map(|p| p.action_token()).collect();
        assert_eq!(verbs, vec![2, 4, 6]);
        for p in &c.processes {
            assert_eq!(p.actor.as_ref().map(|a| a.token()), Some(1));
            let object = p.action.as_ref().and_then(|a| a.object.as_ref());
            assert_eq!(object.map(|o| o.token()), Some(8));
        }
    }

    #[test]
    fn test_relative_pronoun_actor_replaced() {
        let d = relcl_doc();
        let lex = StaticLexicon::new();
        let vocab = Vocabulary::default();
        let ex = Extractor::new(&d, &lex, &vocab);

        let mut c = SentenceContainer::new(Span::new(0, 8));
        let mut p = Process::new(Span::new(2, 6));
        ex.extract_elements(&mut p).unwrap();
        assert_eq!(p.actor.as_ref().map(|a| a.token()), Some(2));
        c.processes.push(p);

        complement_actor(&ex, &mut c).unwrap();
        assert_eq!(c.processes[0].actor.as_ref().map(|a| a.token()), Some(1));
    }

    #[test]
    fn test_correct_model_moves_owner_into_invalid_slot() {
        let d = relcl_doc();
        let mut c = SentenceContainer::new(Span::new(0, 8));
        // "The clerk" alone: no actor, no action
        c.processes.push(Process::new(Span::new(0, 2)));
        let mut signs = Process::new(Span::new(2, 6));
        signs.action = Some(Action::new(3));
        c.processes.push(signs);
        let mut leaves = Process::new(Span::new(6, 8));
        leaves.action = Some(Action::new(6));
        c.processes.push(leaves);

        correct_model(&d, &mut c);
        let verbs: Vec<_> = c.processes.iter().filter_map(|p| p.action_token()).collect();
        assert_eq!(verbs, vec![6, 3]);
        assert!(c.processes.iter().all(|p| !p.is_invalid()));
    }

    #[test]
    fn test_correct_model_drops_orphan() {
        let d = relcl_doc();
        let mut c = SentenceContainer::new(Span::new(0, 8));
        c.processes.push(Process::new(Span::new(7, 8)));
        correct_model(&d, &mut c);
        assert!(c.processes.is_empty());
    }

    proptest! {
        #[test]
        fn prop_promotion_keeps_token_order(extra in 0usize..4) {
            // "The clerk v0 , v1 , ... and vN the form ."
            let verbs = extra + 2;
            let mut rows: Vec<(String, &str, &str, usize)> = vec![
                ("The".into(), "DET", "det", 1),
                ("clerk".into(), "NOUN", "nsubj", 2),
            ];
            for n in 0..verbs {
                let dep = if n == 0 { "ROOT" } else { "conj" };
                rows.push((format!("verb{n}"), "VERB", dep, 2));
                if n + 1 < verbs {
                    rows.push((",".into(), "PUNCT", "punct", 2));
                }
            }
            let obj = rows.len() + 1;
            rows.push(("the".into(), "DET", "det", obj));
            rows.push(("form".into(), "NOUN", "dobj", 2));
            let borrowed: Vec<_> = rows
                .iter()
                .map(|(t, p, d, h)| (t.as_str(), t.as_str(), *p, *d, *h))
                .collect();
            let d = DocumentBuilder::new().sentence(&borrowed, None).build().unwrap();

            let c = analyze(&d);
            let tokens: Vec<_> = c.processes.iter().filter_map(|p| p.action_token()).collect();
            let mut sorted = tokens.clone();
            sorted.sort_unstable();
            prop_assert_eq!(tokens.len(), verbs);
            prop_assert_eq!(tokens, sorted);
        }
    }
}
