//! Hand-off to the diagram renderer.
//!
//! Layout and drawing happen outside this crate. `SyntaxFileRenderer` is the
//! default sink: it writes the DSL text (and optionally the JSON form of
//! the model) next to each other in an output directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PipelineError;
use crate::pipeline::ProcessModel;

pub trait DiagramRenderer {
    /// Render one model; returns the paths written.
    fn render(&self, model: &ProcessModel) -> Result<Vec<PathBuf>, PipelineError>;
}

pub struct SyntaxFileRenderer {
    out_dir: PathBuf,
    write_json: bool,
}

impl SyntaxFileRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            write_json: false,
        }
    }

    pub fn with_json(mut self, write_json: bool) -> Self {
        self.write_json = write_json;
        self
    }

    fn write(path: &Path, content: &str) -> Result<(), PipelineError> {
        fs::write(path, content).map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// File stem safe for any platform.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "process".to_string()
    } else {
        stem
    }
}

impl DiagramRenderer for SyntaxFileRenderer {
    fn render(&self, model: &ProcessModel) -> Result<Vec<PathBuf>, PipelineError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| PipelineError::Write {
            path: self.out_dir.clone(),
            source,
        })?;

        let stem = file_stem(&model.title);
        let mut written = Vec::new();

        let syntax_path = self.out_dir.join(format!("{stem}.bpmn.txt"));
        Self::write(&syntax_path, &model.syntax)?;
        written.push(syntax_path);

        if self.write_json {
            let json_path = self.out_dir.join(format!("{stem}.json"));
            let json = serde_json::to_string_pretty(model).map_err(|e| PipelineError::Write {
                path: json_path.clone(),
                source: std::io::Error::other(e),
            })?;
            Self::write(&json_path, &json)?;
            written.push(json_path);
        }

        info!(title = %model.title, files = written.len(), "diagram written");
        Ok(written)
    }
}
