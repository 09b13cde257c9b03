//! Label clean-up on the emitted syntax.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::llm::{self, LlmClient, LlmError};

static TASK_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]\n]*\]").unwrap());

// "as" inside a task label would read as an element alias
static TASK_AS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[.*?)(\bas\b)(.*?\])").unwrap());

/// Remove filler phrases from task labels and replace "as" inside them
/// with "like".
pub fn post_process(syntax: &str, fillers: &[String]) -> String {
    let cleaned = TASK_LABEL_RE.replace_all(syntax, |caps: &regex::Captures| {
        let mut label = caps[0].to_string();
        for filler in fillers {
            label = label.replace(filler.as_str(), "");
        }
        label
    });
    TASK_AS_RE.replace_all(&cleaned, "${1}like${3}").into_owned()
}

/// Ask the LLM to polish task labels. Any failure keeps the rule-based
/// syntax.
pub fn improve_syntax(llm: &dyn LlmClient, syntax: &str, description: &str) -> String {
    match request_improvement(llm, syntax, description) {
        Ok(improved) => improved,
        Err(e) => {
            warn!(error = %e, "syntax improvement failed, keeping rule-based output");
            syntax.to_string()
        }
    }
}

fn request_improvement(llm: &dyn LlmClient, syntax: &str, description: &str) -> Result<String, LlmError> {
    let answer = llm.chat(
        llm::prompts::REWRITER_SYSTEM,
        &llm::prompts::improve_syntax(syntax, description),
    )?;
    let trimmed = answer.trim();
    if !trimmed.starts_with("title") {
        return Err(LlmError::MalformedSyntax(trimmed.chars().take(40).collect()));
    }
    Ok(format!("{trimmed}\n"))
}
