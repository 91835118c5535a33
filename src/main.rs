use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use surprisal::n_gram::config::PipelineConfig;
use surprisal::pipeline::{run, ModelSource};
use surprisal::scorer::SelectionOutcome;

/// Scores test sentences by their average bigram surprisal under a model
/// trained on a separate corpus.
#[derive(Parser, Debug)]
#[command(name = "bigram-surprisal", version)]
struct Cli {
    /// Training corpus, plain UTF-8 text
    train_corpus: PathBuf,

    /// Test corpus, one candidate sentence per line
    test_corpus: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Number of sentences to select
    #[arg(long)]
    quota: Option<usize>,

    /// Minimum tokens for a sentence to qualify
    #[arg(long)]
    min_tokens: Option<usize>,

    /// Threads used to count the training corpus
    #[arg(long)]
    threads: Option<usize>,

    /// Write the trained model to this csv file
    #[arg(long)]
    save_model: Option<PathBuf>,

    /// Load a saved model instead of training one
    #[arg(long, conflicts_with = "save_model")]
    model: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::read_config(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(quota) = self.quota {
            config.scorer.quota = quota;
        }
        if let Some(min_tokens) = self.min_tokens {
            config.filter.min_tokens = min_tokens;
        }
        if let Some(threads) = self.threads {
            config.trainer.threads = threads;
        }
        config.validate().context("invalid command line overrides")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.pipeline_config()?;

    let source = match &cli.model {
        Some(path) => ModelSource::Load(path),
        None => ModelSource::Train(&cli.train_corpus),
    };
    let source_path = cli.model.as_ref().unwrap_or(&cli.train_corpus);

    let selection = run(source, &cli.test_corpus, &config, cli.save_model.as_deref())
        .with_context(|| {
            format!(
                "scoring {} with the model from {}",
                cli.test_corpus.display(),
                source_path.display()
            )
        })?;

    match selection.outcome {
        SelectionOutcome::QuotaFilled => info!(
            selected = selection.records.len(),
            output = %config.output.directory.display(),
            "done"
        ),
        outcome @ SelectionOutcome::CorpusExhausted { .. } => warn!(
            selected = selection.records.len(),
            output = %config.output.directory.display(),
            "done, {}",
            outcome
        ),
    }
    Ok(())
}
