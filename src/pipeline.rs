//! Document pipeline
//!
//! Runs one parsed document through extraction, markers, cleanup, flow
//! construction, lane resolution, end-activity detection and emission.
//! A batch driver isolates failures per document.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::emit::{describe_flow, labels, DiagramDescription};
use crate::error::PipelineError;
use crate::extract::{cleanup, Extractor};
use crate::flow::{actors, EndActivityDetector, FlowBuilder, Lanes, Structure, StructureIdAllocator};
use crate::llm::{LlmClient, LlmError};
use crate::markers;
use crate::nlp::{Lexicon, ParsedDocument, Span};

/// Everything produced for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessModel {
    pub title: String,
    /// Lane keys after merging and substring removal
    pub actors: Vec<String>,
    pub flow: Vec<Structure>,
    pub diagram: DiagramDescription,
    /// Final diagram DSL text
    pub syntax: String,
}

pub struct Pipeline {
    config: PipelineConfig,
    lexicon: Box<dyn Lexicon>,
    llm: Option<Box<dyn LlmClient>>,
    /// Shared by every document this pipeline processes; never reset.
    ids: StructureIdAllocator,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, lexicon: Box<dyn Lexicon>) -> Self {
        Self {
            config,
            lexicon,
            llm: None,
            ids: StructureIdAllocator::new(),
        }
    }

    pub fn with_llm(mut self, llm: Box<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn llm_for(&self, feature: &str) -> Result<&dyn LlmClient, LlmError> {
        self.llm
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured(feature.to_string()))
    }

    /// Process one document.
    pub fn process(&mut self, doc: &ParsedDocument, title: &str) -> Result<ProcessModel, PipelineError> {
        let features = self.config.features.clone();
        let vocab = &self.config.vocabulary;
        let lexicon = self.lexicon.as_ref();

        // ── Extraction ──
        let mut extractor = Extractor::new(doc, lexicon, vocab);
        if features.llm_real_actor {
            extractor = extractor.with_real_actor_llm(self.llm_for("llm_real_actor")?);
        }
        let mut containers = extractor.analyze_document()?;

        for container in &mut containers {
            markers::determine_markers(doc, vocab, container);
        }
        cleanup::correct_order(&mut containers);
        cleanup::remove_redundant_processes(doc, lexicon, &mut containers);
        debug!(
            sentences = containers.len(),
            processes = containers.iter().map(|c| c.processes.len()).sum::<usize>(),
            "extraction complete"
        );

        // ── Actors ──
        let names = if features.actor_similarity {
            actors::merge_similar_actors(doc, vocab, &self.config.similarity, &mut containers)
        } else {
            actors::valid_actors(&containers)
        };
        let actor_names = actors::adjust_actor_list(&names);

        // ── Flow ──
        let mut flow = FlowBuilder::new(doc, &mut self.ids).build_flows(containers);
        let mut detector = EndActivityDetector::new(doc, self.lexicon.as_ref());
        if features.refine_end_activities {
            detector = detector.with_refiner(self.llm_for("refine_end_activities")?);
        }
        detector.determine(&mut flow)?;
        for structure in &flow {
            debug!("\n{}", structure.describe(doc));
        }

        // ── Emission ──
        let lanes = Lanes::new(actor_names.clone());
        let diagram = describe_flow(
            doc,
            &flow,
            &lanes,
            &self.config.diagram,
            title,
            features.resolve_first_lane,
        );
        let mut syntax = labels::post_process(&diagram.to_syntax(), &self.config.diagram.label_fillers);
        if features.improve_syntax {
            let llm = self.llm_for("improve_syntax")?;
            syntax = labels::improve_syntax(llm, &syntax, &document_text(doc));
        }

        info!(
            title,
            structures = flow.len(),
            lanes = diagram.lanes.len(),
            "process model built"
        );
        Ok(ProcessModel {
            title: title.to_string(),
            actors: actor_names,
            flow,
            diagram,
            syntax,
        })
    }

    /// Load a document JSON file and process it, titled by its file stem.
    pub fn process_file(&mut self, path: &Path) -> Result<ProcessModel, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = ParsedDocument::from_json(&content)?;
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "process".to_string());
        self.process(&doc, &title)
    }

    /// Process every file; a failing document is logged and skipped.
    pub fn process_batch(&mut self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<ProcessModel, PipelineError>)> {
        paths
            .iter()
            .map(|path| {
                let result = self.process_file(path);
                if let Err(e) = &result {
                    warn!(path = %path.display(), error = %e, "document failed");
                }
                (path.clone(), result)
            })
            .collect()
    }
}

fn document_text(doc: &ParsedDocument) -> String {
    if doc.is_empty() {
        return String::new();
    }
    doc.text(Span::new(0, doc.len()))
}
