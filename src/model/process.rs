//! Clause-level processes and their per-sentence container.

use serde::Serialize;

use super::action::{Action, Marker};
use super::entity::{Actor, Participant};
use crate::nlp::{ParsedDocument, Span, TokenIdx};

/// One clause: who does what.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Process {
    pub span: Span,
    pub actor: Option<Actor>,
    pub action: Option<Action>,
}

impl Process {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            actor: None,
            action: None,
        }
    }

    /// Neither actor nor action was found.
    pub fn is_invalid(&self) -> bool {
        self.actor.is_none() && self.action.is_none()
    }

    pub fn action_token(&self) -> Option<TokenIdx> {
        self.action.as_ref().map(|a| a.token)
    }

    pub fn marker(&self) -> Option<Marker> {
        self.action.as_ref().and_then(|a| a.marker)
    }

    /// Actor when the clause is active, object when it is passive.
    pub fn reference_participant(&self) -> Option<Participant<'_>> {
        let action = self.action.as_ref()?;
        if action.active {
            self.actor.as_ref().map(Participant::Actor)
        } else {
            action.object.as_ref().map(Participant::Resource)
        }
    }

    /// Actor text and action text separated by a space.
    pub fn text(&self, doc: &ParsedDocument) -> String {
        let mut parts = Vec::new();
        if let Some(actor) = &self.actor {
            parts.push(actor.text(doc));
        }
        if let Some(action) = &self.action {
            parts.push(action.text(doc));
        }
        parts.join(" ")
    }
}

/// All processes derived from one top-level sentence.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceContainer {
    pub span: Span,
    pub processes: Vec<Process>,
}

impl SentenceContainer {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            processes: Vec::new(),
        }
    }

    fn has_marker(&self, marker: Marker) -> bool {
        self.processes.iter().any(|p| p.marker() == Some(marker))
    }

    pub fn has_if(&self) -> bool {
        self.has_marker(Marker::If)
    }

    pub fn has_else(&self) -> bool {
        self.has_marker(Marker::Else)
    }

    pub fn has_conditional(&self) -> bool {
        self.has_if() || self.has_else()
    }

    pub fn has_while(&self) -> bool {
        self.has_marker(Marker::While)
    }

    /// Position of the process whose action is the given verb.
    pub fn position_of_action(&self, verb: TokenIdx) -> Option<usize> {
        self.processes
            .iter()
            .position(|p| p.action_token() == Some(verb))
    }

    /// Processes joined by "or": the first conjunct verb and the verb it
    /// hangs off, when the latter has an "or" coordinator. Returned as
    /// positions `[conjunct, host]`.
    pub fn or_positions(&self, doc: &ParsedDocument) -> Option<[usize; 2]> {
        let (kid, father) = self.processes.iter().enumerate().find_map(|(n, p)| {
            let verb = p.action_token()?;
            if doc.token(verb).dep == "conj" {
                Some((n, doc.head(verb)?))
            } else {
                None
            }
        })?;

        let host = self.position_of_action(father)?;
        let has_or = doc
            .children_with_dep(father, &["cc"])
            .iter()
            .any(|&cc| doc.token(cc).lower() == "or");
        has_or.then_some([kid, host])
    }

    pub fn has_or(&self, doc: &ParsedDocument) -> bool {
        self.or_positions(doc).is_some()
    }

    pub fn or_processes(&self, doc: &ParsedDocument) -> Vec<&Process> {
        self.or_positions(doc)
            .map(|ps| ps.iter().map(|&n| &self.processes[n]).collect())
            .unwrap_or_default()
    }
}
