//! Closed word lists and multi-word marker templates
//!
//! Every list the extractor consults lives here so a deployment can swap
//! them from the `vocabulary:` section of the pipeline YAML. Defaults are the
//! built-in English lists.

use serde::{Deserialize, Serialize};

use crate::nlp::pattern::{TokenPattern, TokenSpec};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// Root vocabulary. Missing YAML fields keep their default lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub subject_pronouns: Vec<String>,
    pub object_pronouns: Vec<String>,

    /// Names accepted as actors without consulting the lexicon.
    pub real_actor_overrides: Vec<String>,
    /// Hypernyms that make a noun a person, group or system.
    pub real_actor_hypernyms: Vec<String>,

    pub if_indicators: Vec<String>,
    pub else_indicators: Vec<String>,
    pub parallel_indicators: Vec<String>,
    pub sequence_indicators: Vec<String>,

    /// Prepositions whose object may stand in for a missing direct object.
    pub object_prepositions: Vec<String>,
    pub negation_words: Vec<String>,
    /// Prepositions that end an actor's full name ("clerk at the desk").
    pub name_excluded_prepositions: Vec<String>,
    /// Leading determiners stripped from full names.
    pub stripped_determiners: Vec<String>,
    /// Function words ignored by the lemma-overlap measure.
    pub stopwords: Vec<String>,

    pub conditional_patterns: Vec<TokenPattern>,
    pub parallel_patterns: Vec<TokenPattern>,
    pub sequence_patterns: Vec<TokenPattern>,
    /// "in the former / latter case" jump references.
    pub case_patterns: Vec<TokenPattern>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            subject_pronouns: words(&["i", "you", "he", "she", "it", "we", "they"]),
            object_pronouns: words(&["me", "you", "him", "her", "it", "us", "them"]),
            real_actor_overrides: words(&[
                "resource provisioning",
                "customer service",
                "support",
                "support office",
                "support officer",
                "client service back office",
                "master",
                "masters",
                "assembler ag",
                "acme ag",
                "acme financial accounting",
                "secretarial office",
                "office",
                "registry",
                "head",
                "storehouse",
                "atm",
                "crs",
                "company",
                "garage",
                "kitchen",
                "sommelier",
                "department",
                "ec",
                "sp",
                "mpo",
                "mpoo",
                "mpon",
                "msp",
                "mspo",
                "mspn",
                "go",
                "pu",
                "ip",
                "inq",
                "fault detector",
                "mail processing unit",
                "data subject",
                "data subjects",
                "data controller",
                "terminal",
                "switching device",
                "meter",
                "control panel",
            ]),
            real_actor_hypernyms: words(&["person", "social group", "software system"]),
            if_indicators: words(&["if", "whether"]),
            else_indicators: words(&["else", "otherwise"]),
            parallel_indicators: words(&["while", "meanwhile", "concurrently", "meantime"]),
            sequence_indicators: words(&[
                "then",
                "after",
                "afterward",
                "afterwards",
                "subsequently",
                "thus",
            ]),
            object_prepositions: words(&["for", "to", "into", "of"]),
            negation_words: words(&["no", "not", "n't"]),
            name_excluded_prepositions: words(&["as", "within", "at", "of"]),
            stripped_determiners: words(&["the", "a", "an"]),
            stopwords: words(&[
                "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "at", "by", "for",
                "with", "from", "into", "as", "is", "are", "was", "were", "be", "been", "being",
                "this", "that", "these", "those", "it", "its", "his", "her", "their", "our",
                "your", "my", "some", "any", "each", "every", "all", "no", "not", "so", "than",
                "then", "there", "which", "who", "whom", "whose", "what", "when", "where", "if",
            ]),
            conditional_patterns: vec![TokenPattern::new(
                "in/for (the) case (of)",
                vec![
                    TokenSpec::lemma(&["in", "for"]),
                    TokenSpec::lemma(&["the"]).optional(),
                    TokenSpec::lemma(&["case"]),
                    TokenSpec::pos("ADP").optional(),
                ],
            )],
            parallel_patterns: vec![
                TokenPattern::new(
                    "in parallel",
                    vec![TokenSpec::lemma(&["in"]), TokenSpec::lemma(&["parallel"])],
                ),
                TokenPattern::new(
                    "in (the) meantime",
                    vec![
                        TokenSpec::lemma(&["in"]),
                        TokenSpec::pos("DET").optional(),
                        TokenSpec::lemma(&["meantime"]),
                    ],
                ),
            ],
            sequence_patterns: vec![TokenPattern::new(
                "based (on/of)",
                vec![TokenSpec::lemma(&["base"]), TokenSpec::pos("ADP")],
            )],
            case_patterns: vec![TokenPattern::new(
                "in/for (the) former/latter case (of)",
                vec![
                    TokenSpec::lemma(&["in", "for"]),
                    TokenSpec::lemma(&["the"]).optional(),
                    TokenSpec::lemma(&["former", "latter"]),
                    TokenSpec::lemma(&["case"]),
                    TokenSpec::pos("ADP").optional(),
                ],
            )],
        }
    }
}

fn contains_ci(list: &[String], word: &str) -> bool {
    list.iter().any(|w| w.eq_ignore_ascii_case(word))
}

impl Vocabulary {
    /// Personal pronoun in subject or object form.
    pub fn is_pronoun(&self, word: &str) -> bool {
        contains_ci(&self.subject_pronouns, word) || contains_ci(&self.object_pronouns, word)
    }

    pub fn is_real_actor_override(&self, name: &str) -> bool {
        contains_ci(&self.real_actor_overrides, name.trim())
    }

    pub fn is_if(&self, word: &str) -> bool {
        contains_ci(&self.if_indicators, word)
    }

    pub fn is_else(&self, word: &str) -> bool {
        contains_ci(&self.else_indicators, word)
    }

    pub fn is_parallel(&self, word: &str) -> bool {
        contains_ci(&self.parallel_indicators, word)
    }

    pub fn is_sequence(&self, word: &str) -> bool {
        contains_ci(&self.sequence_indicators, word)
    }

    pub fn is_object_preposition(&self, word: &str) -> bool {
        self.object_prepositions.iter().any(|w| w == word)
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negation_words.iter().any(|w| w == word)
    }

    pub fn is_name_excluded_preposition(&self, word: &str) -> bool {
        contains_ci(&self.name_excluded_prepositions, word.trim())
    }

    pub fn is_stripped_determiner(&self, word: &str) -> bool {
        contains_ci(&self.stripped_determiners, word)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        contains_ci(&self.stopwords, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pronouns_case_insensitive() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_pronoun("They"));
        assert!(vocab.is_pronoun("I"));
        assert!(vocab.is_pronoun("them"));
        assert!(!vocab.is_pronoun("clerk"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let vocab: Vocabulary = serde_yaml::from_str("if_indicators: [if, when]").unwrap();
        assert!(vocab.is_if("When"));
        assert!(vocab.is_else("otherwise"));
        assert_eq!(vocab.case_patterns.len(), 1);
    }

    #[test]
    fn test_object_prepositions_are_case_sensitive() {
        let vocab = Vocabulary::default();
        assert!(vocab.is_object_preposition("for"));
        assert!(!vocab.is_object_preposition("with"));
    }
}
