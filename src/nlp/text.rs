//! Raw text clean-up before the text is handed to the NLP front-end.

use regex::Regex;
use std::sync::LazyLock;

/// Parenthesised or square-bracketed asides
static BRACKETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\(\[].*?[\)\]]").unwrap());

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Drop bracketed asides, turn newlines into spaces and collapse runs of
/// whitespace into a single space.
pub fn preprocess_text(text: &str) -> String {
    let without_brackets = BRACKETED_RE.replace_all(text, "");
    let single_line = without_brackets.replace(['\r', '\n'], " ");
    MULTI_SPACE_RE.replace_all(&single_line, " ").trim().to_string()
}
