use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::filter::EligibilityFilter;
use crate::n_gram::config::PipelineConfig;
use crate::n_gram::{FrequencyTables, SurprisalModel};
use crate::scorer::{write_artifacts, Selection, Selector};
use crate::util::{get_lines, read_corpus, split_sentences};

pub enum ModelSource<'a> {
    // Segment and count a raw training corpus
    Train(&'a Path),
    // Reuse a model written by `SurprisalModel::save`
    Load(&'a Path),
}

pub fn train_from_text(text: &str, threads: usize) -> Result<SurprisalModel> {
    let sentences = split_sentences(text);
    let tables = FrequencyTables::train_multi(&sentences, threads);
    Ok(SurprisalModel::from_tables(&tables)?)
}

pub fn build_model(source: ModelSource<'_>, config: &PipelineConfig) -> Result<SurprisalModel> {
    match source {
        ModelSource::Train(path) => {
            info!(path = %path.display(), "reading training corpus");
            let text = read_corpus(path)?;
            train_from_text(&text, config.trainer.threads)
        }
        ModelSource::Load(path) => SurprisalModel::load(path),
    }
}

/// Streams the test corpus through the filter and the selector. The model's
/// bigrams double as the coverage vocabulary; it holds exactly the trained
/// bigram table's keys.
pub fn select_from_corpus(test_corpus: &Path, model: &SurprisalModel, config: &PipelineConfig) -> Result<Selection> {
    info!(path = %test_corpus.display(), "scanning test corpus");
    let lines = get_lines(test_corpus)?;
    let mut filter = EligibilityFilter::new(lines, model, config.filter.min_tokens);
    let selector = Selector::new(model, config.scorer.quota, config.scorer.default_surprisal);
    let selection = selector.select(&mut filter)?;
    info!(lines_scanned = filter.scanned(), selected = selection.records.len(), "finished scanning");
    Ok(selection)
}

pub fn run(
    source: ModelSource<'_>,
    test_corpus: &Path,
    config: &PipelineConfig,
    save_model: Option<&Path>,
) -> Result<Selection> {
    let model = build_model(source, config)?;
    if let Some(path) = save_model {
        model.save(path)?;
    }
    let selection = select_from_corpus(test_corpus, &model, config)?;
    write_artifacts(&selection.records, &config.output.directory, &config.output.csv)?;
    Ok(selection)
}
