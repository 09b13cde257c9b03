//! End-to-end scenarios through the public pipeline API.

use std::fs;

use text2bpmn::emit::{DiagramRenderer, SyntaxFileRenderer};
use text2bpmn::flow::{ConditionType, Structure};
use text2bpmn::llm::{LlmError, ScriptedLlm};
use text2bpmn::nlp::builder::DocumentBuilder;
use text2bpmn::nlp::dto::ConstituentDto;
use text2bpmn::nlp::{ParsedDocument, StaticLexicon};
use text2bpmn::{DocumentError, Pipeline, PipelineConfig, PipelineError};

fn lexicon() -> StaticLexicon {
    let mut lex = StaticLexicon::new();
    lex.add_chain(
        "customer",
        &["customer.n.01", "consumer.n.01", "user.n.01", "person.n.01"],
    );
    lex.add_chain("clerk", &["clerk.n.01", "worker.n.01", "person.n.01"]);
    lex.add_chain("manager", &["manager.n.01", "head.n.04", "person.n.01"]);
    lex
}

fn pipeline(config: PipelineConfig) -> Pipeline {
    Pipeline::new(config, Box::new(lexicon()))
}

// "If the customer accepts the offer, the clerk processes the order.
//  Otherwise, the clerk cancels the order."
fn if_otherwise_doc() -> ParsedDocument {
    let first = ConstituentDto::new(&["S"], 0, 13).with_children(vec![
        ConstituentDto::new(&["SBAR"], 0, 6).with_children(vec![ConstituentDto::new(&["S"], 1, 6)]),
    ]);
    DocumentBuilder::new()
        .sentence(
            &[
                ("If", "if", "SCONJ", "mark", 3),
                ("the", "the", "DET", "det", 2),
                ("customer", "customer", "NOUN", "nsubj", 3),
                ("accepts", "accept", "VERB", "advcl", 9),
                ("the", "the", "DET", "det", 5),
                ("offer", "offer", "NOUN", "dobj", 3),
                (",", ",", "PUNCT", "punct", 9),
                ("the", "the", "DET", "det", 8),
                ("clerk", "clerk", "NOUN", "nsubj", 9),
                ("processes", "process", "VERB", "ROOT", 9),
                ("the", "the", "DET", "det", 11),
                ("order", "order", "NOUN", "dobj", 9),
                (".", ".", "PUNCT", "punct", 9),
            ],
            Some(first),
        )
        .sentence(
            &[
                ("Otherwise", "otherwise", "ADV", "advmod", 4),
                (",", ",", "PUNCT", "punct", 4),
                ("the", "the", "DET", "det", 3),
                ("clerk", "clerk", "NOUN", "nsubj", 4),
                ("cancels", "cancel", "VERB", "ROOT", 4),
                ("the", "the", "DET", "det", 6),
                ("order", "order", "NOUN", "dobj", 4),
                (".", ".", "PUNCT", "punct", 4),
            ],
            Some(ConstituentDto::new(&["S"], 0, 8)),
        )
        .build()
        .unwrap()
}

// "The clerk checks the form."
fn single_step_builder() -> DocumentBuilder {
    DocumentBuilder::new().sentence(
        &[
            ("The", "the", "DET", "det", 1),
            ("clerk", "clerk", "NOUN", "nsubj", 2),
            ("checks", "check", "VERB", "ROOT", 2),
            ("the", "the", "DET", "det", 4),
            ("form", "form", "NOUN", "dobj", 2),
            (".", ".", "PUNCT", "punct", 2),
        ],
        Some(ConstituentDto::new(&["S"], 0, 6)),
    )
}

// "The form is signed by the manager."
fn passive_doc() -> ParsedDocument {
    DocumentBuilder::new()
        .sentence(
            &[
                ("The", "the", "DET", "det", 1),
                ("form", "form", "NOUN", "nsubjpass", 3),
                ("is", "be", "AUX", "auxpass", 3),
                ("signed", "sign", "VERB", "ROOT", 3),
                ("by", "by", "ADP", "agent", 3),
                ("the", "the", "DET", "det", 6),
                ("manager", "manager", "NOUN", "pobj", 4),
                (".", ".", "PUNCT", "punct", 3),
            ],
            None,
        )
        .build()
        .unwrap()
}

#[test]
fn test_if_otherwise_produces_two_lane_gateway() {
    let doc = if_otherwise_doc();
    let model = pipeline(PipelineConfig::default())
        .process(&doc, "order handling")
        .unwrap();

    assert_eq!(model.actors, vec!["customer".to_string(), "clerk".to_string()]);
    assert_eq!(model.flow.len(), 1);
    let Structure::ConditionBlock(block) = &model.flow[0] else {
        panic!("expected an exclusive block, got {:?}", model.flow[0]);
    };
    assert!(block.is_simple());
    assert_eq!(block.branches[0].kind, ConditionType::If);
    assert_eq!(block.branches[1].kind, ConditionType::Else);
    assert_eq!(
        block.branches[0].conditions[0].process.text(&doc),
        "the customer accepts the offer"
    );
    assert_eq!(
        block.branches[0].actions[0].process.text(&doc),
        "the clerk processes the order"
    );
    assert_eq!(
        block.branches[1].actions[0].process.text(&doc),
        "the clerk cancels the order"
    );

    let expected = "title: order handling\n\
                    width: 10000\n\
                    colourtheme: BLUEMOUNTAIN\n\
                    lane: customer\n\
                    \t(start) as start\n\
                    \t<the customer accepts the offer?> as gateway_1\n\
                    lane: clerk\n\
                    \t[processes the order] as activity_3\n\
                    \t[cancels the order] as activity_4\n\
                    \t<> as gateway_1_end\n\
                    \t(end) as end\n\
                    \n\
                    start->gateway_1\n\
                    gateway_1-\"yes\"->activity_3->gateway_1_end\n\
                    gateway_1-\"no\"->activity_4->gateway_1_end\n\
                    gateway_1_end->end\n";
    assert_eq!(model.syntax, expected);
}

#[test]
fn test_single_actor_uses_unnamed_lane() {
    let doc = single_step_builder().build().unwrap();
    let model = pipeline(PipelineConfig::default()).process(&doc, "t").unwrap();

    assert_eq!(model.diagram.lanes.len(), 1);
    assert_eq!(model.diagram.lanes[0].name, "");
    assert_eq!(
        model.syntax,
        "title: t\nwidth: 10000\ncolourtheme: BLUEMOUNTAIN\nlane: \n\
         \t(start) as start\n\t[the clerk checks the form] as activity_1\n\t(end) as end\n\
         \nstart->activity_1->end\n"
    );
}

#[test]
fn test_passive_clause_names_agent_as_actor() {
    let doc = passive_doc();
    let model = pipeline(PipelineConfig::default()).process(&doc, "t").unwrap();

    assert_eq!(model.actors, vec!["manager".to_string()]);
    assert!(model.syntax.contains("\t[the manager sign the form] as activity_1\n"));
}

#[test]
fn test_unknown_actor_keeps_activity_without_lane() {
    // Nothing in an empty lexicon is a real actor: the step stays in the
    // flow but no lane is named after its actor.
    let doc = single_step_builder().build().unwrap();
    let mut p = Pipeline::new(PipelineConfig::default(), Box::new(StaticLexicon::new()));
    let model = p.process(&doc, "t").unwrap();

    assert_eq!(model.flow.len(), 1);
    assert!(model.actors.is_empty());
    assert_eq!(model.diagram.lanes.len(), 1);
    assert!(model.syntax.contains("\t[the clerk checks the form] as activity_1\n"));
}

#[test]
fn test_ids_continue_across_documents() {
    let doc = single_step_builder().build().unwrap();
    let mut p = pipeline(PipelineConfig::default());

    let first = p.process(&doc, "a").unwrap();
    let second = p.process(&doc, "b").unwrap();
    assert!(first.syntax.contains("as activity_1\n"));
    assert!(second.syntax.contains("as activity_2\n"));
}

#[test]
fn test_llm_feature_without_client_fails() {
    let config = PipelineConfig::from_yaml("features:\n  llm_real_actor: true\n").unwrap();
    let doc = single_step_builder().build().unwrap();
    let err = pipeline(config).process(&doc, "t").unwrap_err();

    assert!(matches!(err, PipelineError::Llm(LlmError::NotConfigured(_))));
}

#[test]
fn test_improved_syntax_replaces_rule_output() {
    let config = PipelineConfig::from_yaml("features:\n  improve_syntax: true\n").unwrap();
    let doc = single_step_builder().build().unwrap();
    let llm = ScriptedLlm::new(vec!["title: t\nlane: \n\t[checks the form] as activity_1\n"]);
    let model = pipeline(config)
        .with_llm(Box::new(llm))
        .process(&doc, "t")
        .unwrap();

    assert_eq!(model.syntax, "title: t\nlane: \n\t[checks the form] as activity_1\n");
}

#[test]
fn test_improvement_failure_keeps_rule_output() {
    let config = PipelineConfig::from_yaml("features:\n  improve_syntax: true\n").unwrap();
    let doc = single_step_builder().build().unwrap();
    let model = pipeline(config)
        .with_llm(Box::new(ScriptedLlm::new(vec![])))
        .process(&doc, "t")
        .unwrap();

    assert!(model.syntax.starts_with("title: t\nwidth: 10000\n"));
    assert!(model.syntax.contains("[the clerk checks the form] as activity_1"));
}

#[test]
fn test_batch_isolates_bad_documents() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("broken.json");
    let good = dir.path().join("checking.json");
    fs::write(&bad, "{ not json").unwrap();
    let dto = single_step_builder().into_dto();
    fs::write(&good, serde_json::to_string(&dto).unwrap()).unwrap();

    let mut p = pipeline(PipelineConfig::default());
    let results = p.process_batch(&[bad.clone(), good.clone()]);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, bad);
    assert!(matches!(
        results[0].1,
        Err(PipelineError::Document(DocumentError::Json(_)))
    ));
    let model = results[1].1.as_ref().unwrap();
    assert_eq!(model.title, "checking");
}

#[test]
fn test_invalid_document_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cyclic.json");
    let mut dto = single_step_builder().into_dto();
    dto.tokens[0].head = 99;
    fs::write(&path, serde_json::to_string(&dto).unwrap()).unwrap();

    let err = pipeline(PipelineConfig::default())
        .process_file(&path)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Document(DocumentError::Invalid(_))
    ));
}

#[test]
fn test_renderer_writes_syntax_and_json() {
    let doc = single_step_builder().build().unwrap();
    let model = pipeline(PipelineConfig::default())
        .process(&doc, "form check")
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let written = SyntaxFileRenderer::new(dir.path())
        .with_json(true)
        .render(&model)
        .unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(written[0], dir.path().join("form_check.bpmn.txt"));
    assert_eq!(fs::read_to_string(&written[0]).unwrap(), model.syntax);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
    assert_eq!(json["title"], "form check");
}
