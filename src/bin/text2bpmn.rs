//! text2bpmn CLI
//!
//! Usage:
//!   text2bpmn run --config pipeline.yaml --lexicon lexicon.yaml --out out/ docs/*.json
//!   text2bpmn run --llm --json docs/order.json
//!   text2bpmn preprocess description.txt
//!
//! `run` takes parsed-document JSON produced by the NLP front-end. Each
//! document is processed on its own; a failing document is reported and the
//! batch continues. `preprocess` prints the cleaned text to feed that
//! front-end.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use text2bpmn::emit::{DiagramRenderer, SyntaxFileRenderer};
use text2bpmn::llm::OpenAiClient;
use text2bpmn::nlp::text::preprocess_text;
use text2bpmn::nlp::StaticLexicon;
use text2bpmn::{Pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "text2bpmn")]
#[command(about = "Extract process diagrams from parsed process descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build diagrams for one or more parsed documents
    Run {
        /// Pipeline configuration (YAML)
        #[arg(long, short = 'c', env = "TEXT2BPMN_CONFIG")]
        config: Option<PathBuf>,

        /// Lexical hierarchy (YAML synset graph)
        #[arg(long, short = 'l', env = "TEXT2BPMN_LEXICON")]
        lexicon: Option<PathBuf>,

        /// Output directory
        #[arg(long, short = 'o', default_value = "out")]
        out: PathBuf,

        /// Also write the full model as JSON
        #[arg(long)]
        json: bool,

        /// Connect the LLM collaborator (needs OPENAI_API_KEY or the configured variable)
        #[arg(long)]
        llm: bool,

        /// Parsed-document JSON files
        #[arg(required = true)]
        docs: Vec<PathBuf>,
    },

    /// Clean raw text before handing it to the NLP front-end
    Preprocess {
        /// Raw text file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Run {
            config,
            lexicon,
            out,
            json,
            llm,
            docs,
        } => run(config, lexicon, out, json, llm, &docs),
        Command::Preprocess { file } => preprocess(&file).map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns false when at least one document failed.
fn run(
    config: Option<PathBuf>,
    lexicon: Option<PathBuf>,
    out: PathBuf,
    json: bool,
    use_llm: bool,
    docs: &[PathBuf],
) -> Result<bool> {
    let config = match config {
        Some(path) => PipelineConfig::load(&path)?,
        None => PipelineConfig::default(),
    };
    let lexicon = match lexicon {
        Some(path) => StaticLexicon::load(&path)?,
        None => StaticLexicon::new(),
    };

    if config.features.needs_llm() && !use_llm {
        bail!("the configuration enables LLM features; pass --llm to connect the client");
    }

    let mut pipeline = Pipeline::new(config, Box::new(lexicon));
    if use_llm {
        let client = OpenAiClient::from_config(&pipeline.config().llm)
            .context("Failed to create the LLM client")?;
        pipeline = pipeline.with_llm(Box::new(client));
    }

    let renderer = SyntaxFileRenderer::new(&out).with_json(json);
    let mut failed = 0;
    for (path, result) in pipeline.process_batch(docs) {
        let written = result.and_then(|model| renderer.render(&model));
        match written {
            Ok(files) => {
                for file in files {
                    println!("{} -> {}", path.display(), file.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{}: {e}", path.display());
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} documents failed", docs.len());
    }
    Ok(failed == 0)
}

fn preprocess(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    println!("{}", preprocess_text(&text));
    Ok(())
}
