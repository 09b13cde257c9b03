//! Document-level cleanup after markers are assigned.

use tracing::debug;

use crate::model::{Marker, Process, SentenceContainer};
use crate::nlp::lexical::{hypernyms_checker, verb_hypernyms_checker, Lexicon};
use crate::nlp::ParsedDocument;

/// Move conditional processes to the front of their container, keeping the
/// relative order of everything else.
pub fn correct_order(containers: &mut [SentenceContainer]) {
    for container in containers {
        if container.processes.len() < 2 {
            continue;
        }
        let (mut front, rest): (Vec<Process>, Vec<Process>) = container
            .processes
            .drain(..)
            .partition(|p| p.marker() == Some(Marker::If));
        front.extend(rest);
        container.processes = front;
    }
}

/// "The process begins ..." style meta-statements.
fn describes_process_start(doc: &ParsedDocument, lexicon: &dyn Lexicon, process: &Process) -> bool {
    let (Some(actor), Some(action)) = (&process.actor, &process.action) else {
        return false;
    };
    hypernyms_checker(lexicon, doc.token(actor.token()), &["activity".to_string()])
        && verb_hypernyms_checker(lexicon, doc.token(action.token), &["begin".to_string()])
}

/// Processes that carry no modelling step: no action, a bare auxiliary,
/// "consist"/"include", "be" without a complement, modal "have to", and
/// process-start statements.
fn is_redundant(doc: &ParsedDocument, lexicon: &dyn Lexicon, process: &Process) -> bool {
    let Some(action) = &process.action else {
        return true;
    };
    let verb = doc.token(action.token);
    if verb.pos == "AUX" {
        return true;
    }
    match verb.lemma.as_str() {
        "consist" | "include" => true,
        "be" => doc
            .children_with_dep(action.token, &["acomp", "attr"])
            .is_empty(),
        "have" => !doc.children_with_dep(action.token, &["xcomp"]).is_empty(),
        _ => describes_process_start(doc, lexicon, process),
    }
}

pub fn remove_redundant_processes(
    doc: &ParsedDocument,
    lexicon: &dyn Lexicon,
    containers: &mut [SentenceContainer],
) {
    for container in containers {
        let before = container.processes.len();
        container
            .processes
            .retain(|process| !is_redundant(doc, lexicon, process));
        if container.processes.len() < before {
            debug!(
                removed = before - container.processes.len(),
                "redundant processes pruned"
            );
        }
    }
}
