use super::dto::*;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub rule: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

fn issue(rule: &str, message: String) -> ValidationError {
    ValidationError {
        rule: rule.to_string(),
        message,
    }
}

/// Validate a DocumentDto before loading it into the arena. Returns all errors found.
pub fn validate_document(dto: &DocumentDto) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let len = dto.tokens.len();

    // D6: At least one token
    if len == 0 {
        errors.push(issue("D6", "document has no tokens".to_string()));
        return errors;
    }

    // D1: Heads in range
    let mut heads_ok = true;
    for (i, token) in dto.tokens.iter().enumerate() {
        if token.head >= len {
            heads_ok = false;
            errors.push(issue(
                "D1",
                format!("token {} ('{}') has head {} out of range", i, token.text, token.head),
            ));
        }
    }

    // D2: Every head chain reaches a root
    if heads_ok {
        for i in 0..len {
            let mut current = i;
            let mut steps = 0;
            while dto.tokens[current].head != current {
                current = dto.tokens[current].head;
                steps += 1;
                if steps > len {
                    errors.push(issue(
                        "D2",
                        format!("head chain of token {} never reaches a root", i),
                    ));
                    break;
                }
            }
        }
    }

    // D3: Sentences ordered, non-empty, non-overlapping, in range
    let mut previous_end = 0;
    for (n, sentence) in dto.sentences.iter().enumerate() {
        if sentence.start >= sentence.end {
            errors.push(issue(
                "D3",
                format!("sentence {} is empty ({}..{})", n, sentence.start, sentence.end),
            ));
        }
        if sentence.end > len {
            errors.push(issue(
                "D3",
                format!("sentence {} ends at {} beyond {} tokens", n, sentence.end, len),
            ));
        }
        if sentence.start < previous_end {
            errors.push(issue(
                "D3",
                format!("sentence {} overlaps the previous sentence", n),
            ));
        }
        previous_end = previous_end.max(sentence.end);

        // D4: Constituents nest inside the sentence
        if let Some(parse) = &sentence.parse {
            validate_constituent(parse, sentence.start, sentence.end, n, &mut errors);
        }
    }

    // D5: Coreference indices in range
    for link in &dto.coreference {
        if link.mention >= len || link.antecedents.iter().any(|&a| a >= len) {
            errors.push(issue(
                "D5",
                format!("coreference link for mention {} is out of range", link.mention),
            ));
        }
    }

    errors
}

fn validate_constituent(
    node: &ConstituentDto,
    lower: usize,
    upper: usize,
    sentence: usize,
    errors: &mut Vec<ValidationError>,
) {
    if node.start < lower || node.end > upper || node.start > node.end {
        errors.push(issue(
            "D4",
            format!(
                "constituent {:?} {}..{} escapes its parent {}..{} in sentence {}",
                node.labels, node.start, node.end, lower, upper, sentence
            ),
        ));
        return;
    }
    for child in &node.children {
        validate_constituent(child, node.start, node.end, sentence, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, head: usize) -> TokenDto {
        TokenDto {
            text: text.to_string(),
            lemma: text.to_lowercase(),
            pos: "NOUN".to_string(),
            tag: String::new(),
            dep: "dep".to_string(),
            head,
            whitespace: true,
        }
    }

    fn minimal_valid_dto() -> DocumentDto {
        DocumentDto {
            tokens: vec![token("clerk", 1), token("works", 1)],
            sentences: vec![SentenceDto {
                start: 0,
                end: 2,
                parse: Some(ConstituentDto::new(&["S"], 0, 2)),
            }],
            coreference: vec![],
        }
    }

    fn has_rule(errors: &[ValidationError], rule: &str) -> bool {
        errors.iter().any(|e| e.rule == rule)
    }

    #[test]
    fn test_valid_document_passes() {
        assert!(validate_document(&minimal_valid_dto()).is_empty());
    }

    #[test]
    fn test_empty_document() {
        let errors = validate_document(&DocumentDto::default());
        assert!(has_rule(&errors, "D6"));
    }

    #[test]
    fn test_head_out_of_range() {
        let mut dto = minimal_valid_dto();
        dto.tokens[0].head = 7;
        assert!(has_rule(&validate_document(&dto), "D1"));
    }

    #[test]
    fn test_head_cycle() {
        let mut dto = minimal_valid_dto();
        dto.tokens[0].head = 1;
        dto.tokens[1].head = 0;
        assert!(has_rule(&validate_document(&dto), "D2"));
    }

    #[test]
    fn test_sentence_beyond_tokens() {
        let mut dto = minimal_valid_dto();
        dto.sentences[0].end = 5;
        dto.sentences[0].parse = None;
        assert!(has_rule(&validate_document(&dto), "D3"));
    }

    #[test]
    fn test_constituent_escapes_sentence() {
        let mut dto = minimal_valid_dto();
        dto.sentences[0].parse =
            Some(ConstituentDto::new(&["S"], 0, 2).with_children(vec![ConstituentDto::new(
                &["NP"],
                1,
                3,
            )]));
        assert!(has_rule(&validate_document(&dto), "D4"));
    }

    #[test]
    fn test_coreference_out_of_range() {
        let mut dto = minimal_valid_dto();
        dto.coreference.push(CorefDto {
            mention: 0,
            antecedents: vec![4],
        });
        assert!(has_rule(&validate_document(&dto), "D5"));
    }
}
