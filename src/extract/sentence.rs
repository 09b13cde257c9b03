//! Clause splitting and per-clause element extraction.

use tracing::debug;

use super::entity::Extractor;
use super::repair;
use crate::llm::LlmError;
use crate::model::{Process, SentenceContainer};
use crate::nlp::{Constituent, ParsedDocument, Sentence, Span, TokenIdx};

/// Single-token clauses consisting of one of these are dropped.
const PUNCTUATION: &[&str] = &[",", ".", ";", ":", "!", "?", "-", "(", ")", "\"", "'"];

// ── Clause splitting ──

/// Split a sentence into clause spans using its constituency parse.
///
/// Every SBAR contributes its start and end as boundaries; every S does too
/// unless its parent is an SBAR. Unlabeled nodes stop the descent. Without a
/// parse the whole sentence is one clause.
pub fn clause_spans(doc: &ParsedDocument, sentence: &Sentence) -> Vec<Span> {
    let Some(parse) = &sentence.parse else {
        return vec![sentence.span];
    };

    let mut bounds = Vec::new();
    collect_bounds(parse, None, &mut bounds);
    bounds.sort_unstable();
    bounds.dedup();

    bounds
        .windows(2)
        .map(|w| Span::new(w[0], w[1]))
        .filter(|span| !is_lone_punctuation(doc, *span))
        .collect()
}

fn collect_bounds(node: &Constituent, parent: Option<&Constituent>, bounds: &mut Vec<TokenIdx>) {
    if node.labels.is_empty() {
        return;
    }
    let under_sbar = parent.is_some_and(|p| p.has_label("SBAR"));
    if node.has_label("SBAR") || (node.has_label("S") && !under_sbar) {
        bounds.push(node.span.start);
        bounds.push(node.span.end);
    }
    for child in &node.children {
        collect_bounds(child, Some(node), bounds);
    }
}

fn is_lone_punctuation(doc: &ParsedDocument, span: Span) -> bool {
    span.len() == 1 && PUNCTUATION.contains(&doc.token(span.start).text.as_str())
}

// ── Element extraction ──

impl Extractor<'_> {
    /// Active unless the clause contains a passive auxiliary.
    pub fn is_active(&self, span: Span) -> bool {
        !self.doc.span_has_dep(span, "auxpass")
    }

    /// Subject in active voice, object of the "by" agent in passive voice.
    pub fn determine_actor(&self, span: Span, active: bool) -> Option<TokenIdx> {
        if active {
            self.doc.span_dependents(span, &["nsubj"]).first().copied()
        } else {
            let agent = self.doc.span_dependents(span, &["agent"]).first().copied()?;
            self.doc.children(agent).first().copied()
        }
    }

    /// Head of the subject; in active clauses without a subject, head of the
    /// direct object.
    pub fn determine_predicate(&self, span: Span, active: bool) -> Option<TokenIdx> {
        let anchor = if active {
            self.doc
                .span_dependents(span, &["nsubj"])
                .first()
                .copied()
                .or_else(|| self.doc.span_dependents(span, &["dobj"]).first().copied())
        } else {
            self.doc
                .span_dependents(span, &["nsubjpass"])
                .first()
                .copied()
        };
        anchor.and_then(|a| self.doc.head(a))
    }

    /// Direct object, else the object of an object-introducing preposition.
    /// Passive clauses use the passive subject.
    pub fn determine_object(&self, predicate: TokenIdx, active: bool) -> Option<TokenIdx> {
        let doc = self.doc;
        if !active {
            return doc.first_child_with_dep(predicate, &["nsubjpass"]);
        }
        if let Some(dobj) = doc.first_child_with_dep(predicate, &["dobj"]) {
            return Some(dobj);
        }
        doc.children_with_dep(predicate, &["prep"])
            .into_iter()
            .find(|&p| self.vocab.is_object_preposition(&doc.token(p).text))
            .and_then(|p| doc.first_child_with_dep(p, &["pobj"]))
    }

    /// Fill a process with actor, action and object for its clause span.
    /// Conjunct verbs strictly inside the span become sibling actions with
    /// the host's voice.
    pub fn extract_elements(&self, process: &mut Process) -> Result<(), LlmError> {
        let span = process.span;
        let active = self.is_active(span);

        process.actor = self
            .determine_actor(span, active)
            .map(|t| self.create_actor(t))
            .transpose()?;

        let Some(verb) = self.determine_predicate(span, active) else {
            return Ok(());
        };
        let object = self.determine_object(verb, active);
        let mut action = self.create_action(verb, object);
        action.active = active;

        for conj in self.doc.conjuncts(verb) {
            if span.strictly_contains(conj) {
                let conj_object = self.determine_object(conj, active);
                let mut sibling = self.create_action(conj, conj_object);
                sibling.active = active;
                action.conjunctions.push(sibling);
            }
        }
        process.action = Some(action);
        Ok(())
    }

    /// One container per sentence, one process per clause, followed by the
    /// per-container repair passes.
    pub fn analyze_document(&self) -> Result<Vec<SentenceContainer>, LlmError> {
        let mut containers = Vec::with_capacity(self.doc.sentences().len());
        for sentence in self.doc.sentences() {
            let mut container = SentenceContainer::new(sentence.span);
            for span in clause_spans(self.doc, sentence) {
                let mut process = Process::new(span);
                self.extract_elements(&mut process)?;
                container.processes.push(process);
            }

            repair::complement_actor(self, &mut container)?;
            repair::complement_object(self.doc, &mut container);
            repair::correct_model(self.doc, &mut container);
            repair::complement_model(&mut container);

            debug!(
                sentence = %self.doc.text(sentence.span),
                processes = container.processes.len(),
                "analyzed sentence"
            );
            containers.push(container);
        }
        Ok(containers)
    }
}
