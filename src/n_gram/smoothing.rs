use tracing::info;

use crate::error::SurprisalError;
use crate::n_gram::{BigramVocabulary, FrequencyTables};
use crate::types::{Bigram, SurprisalMap};

/// `-log2(probability)`. Fails unless `probability` lies in (0, 1].
pub fn surprisal(probability: f64) -> Result<f64, SurprisalError> {
    if !(probability > 0.0 && probability <= 1.0) {
        return Err(SurprisalError::InvalidProbability(probability));
    }
    // -log2(1.0) is -0.0
    Ok(0.0 - probability.log2())
}

/// Add-one smoothed ratio `(count(w1 w2) + 1) / (count(w1) + 1)`.
///
/// Each bigram is smoothed on its own; the values for a fixed `w1` are not
/// renormalised over the vocabulary.
pub fn smoothed_probability(bigram_count: usize, unigram_count: usize) -> f64 {
    (bigram_count as f64 + 1.0) / (unigram_count as f64 + 1.0)
}

/// Surprisal for every bigram observed in training.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurprisalModel {
    pub(crate) surprisals: SurprisalMap,
}

impl SurprisalModel {
    pub fn from_tables(tables: &FrequencyTables) -> Result<SurprisalModel, SurprisalError> {
        let mut surprisals = SurprisalMap::with_capacity(tables.bigram_types());
        for ((w1, w2), count) in tables.bigrams() {
            let probability = smoothed_probability(*count, tables.unigram_count(w1));
            surprisals.insert((w1.clone(), w2.clone()), surprisal(probability)?);
        }
        info!(entries = surprisals.len(), "built bigram surprisal map");
        Ok(SurprisalModel { surprisals })
    }

    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        self.surprisals
            .get(&(String::from(first), String::from(second)))
            .copied()
    }

    /// Looks the bigram up, answering `default` for pairs never seen in training.
    pub fn lookup_or(&self, bigram: &Bigram, default: f64) -> f64 {
        self.surprisals.get(bigram).copied().unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.surprisals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surprisals.is_empty()
    }

    pub fn surprisals(&self) -> &SurprisalMap {
        &self.surprisals
    }
}

impl BigramVocabulary for SurprisalModel {
    fn contains_bigram(&self, first: &str, second: &str) -> bool {
        self.surprisals
            .contains_key(&(String::from(first), String::from(second)))
    }
}
