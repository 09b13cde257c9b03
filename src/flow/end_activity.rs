//! End-of-process detection.

use tracing::debug;

use super::structure::Structure;
use crate::llm::{self, LlmClient, LlmError};
use crate::model::{Participant, Process};
use crate::nlp::lexical::{hypernyms_checker, verb_hypernyms_checker, Lexicon};
use crate::nlp::{ParsedDocument, Span};

pub struct EndActivityDetector<'a> {
    doc: &'a ParsedDocument,
    lexicon: &'a dyn Lexicon,
    refiner: Option<&'a dyn LlmClient>,
}

impl<'a> EndActivityDetector<'a> {
    pub fn new(doc: &'a ParsedDocument, lexicon: &'a dyn Lexicon) -> Self {
        Self {
            doc,
            lexicon,
            refiner: None,
        }
    }

    /// Ask `llm` about the last action of each branch the lexical rules
    /// left open.
    pub fn with_refiner(mut self, llm: &'a dyn LlmClient) -> Self {
        self.refiner = Some(llm);
        self
    }

    /// Flag the last structure, plus branch actions that end the process:
    /// an event that ends, or a message that is refused.
    pub fn determine(&self, flow: &mut [Structure]) -> Result<(), LlmError> {
        if let Some(last) = flow.last_mut() {
            last.set_end_activity(true);
        }

        for structure in flow.iter_mut() {
            let Structure::ConditionBlock(block) = structure else {
                continue;
            };
            for branch in &mut block.branches {
                for activity in &mut branch.actions {
                    if self.ends_process(&activity.process) {
                        debug!(id = activity.id, "lexical end activity");
                        activity.is_end_activity = true;
                    }
                }
                if let Some(llm) = self.refiner {
                    if let Some(last) = branch.actions.last_mut() {
                        if !last.is_end_activity {
                            let prompt = llm::prompts::ends_process(
                                &last.process.text(self.doc),
                                &self.description(),
                            );
                            last.is_end_activity = llm::classify(llm, &prompt)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn ends_process(&self, process: &Process) -> bool {
        let (Some(reference), Some(action)) = (process.reference_participant(), &process.action) else {
            return false;
        };
        let doc = self.doc;
        let verb = doc.token(action.token);

        if hypernyms_checker(self.lexicon, doc.token(reference.token()), &words(&["event"]))
            && verb_hypernyms_checker(self.lexicon, verb, &words(&["end"]))
        {
            return true;
        }
        matches!(reference, Participant::Actor(_))
            && action.object.as_ref().is_some_and(|object| {
                hypernyms_checker(self.lexicon, doc.token(object.token()), &words(&["message"]))
                    && verb_hypernyms_checker(self.lexicon, verb, &words(&["refuse"]))
            })
    }

    fn description(&self) -> String {
        let sentences = self.doc.sentences();
        match (sentences.first(), sentences.last()) {
            (Some(first), Some(last)) => self
                .doc
                .text(Span::new(first.span.start, last.span.end)),
            _ => String::new(),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}
