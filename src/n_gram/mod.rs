use itertools::Itertools;
use tracing::{debug, info};

pub mod config;
pub mod file;
pub mod smoothing;

pub use self::smoothing::{smoothed_probability, surprisal, SurprisalModel};

use crate::types::{BigramTable, Token, UnigramTable};
use crate::util::{bigrams, multi_thread_process_list, tokenize};

/// Anything that can answer "was this bigram seen during training?".
pub trait BigramVocabulary {
    fn contains_bigram(&self, first: &str, second: &str) -> bool;

    fn covers(&self, tokens: &[Token]) -> bool {
        tokens
            .iter()
            .tuple_windows()
            .all(|(w1, w2)| self.contains_bigram(w1, w2))
    }
}

/// Unigram and bigram counts over a training corpus.
///
/// Built once by [`FrequencyTables::train`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTables {
    unigrams: UnigramTable,
    bigrams: BigramTable,
}

impl FrequencyTables {
    fn feed(&mut self, sentence: &str) {
        let tokens = tokenize(sentence);
        for token in &tokens {
            *self.unigrams.entry(token.clone()).or_insert(0) += 1;
        }
        for bigram in bigrams(&tokens) {
            *self.bigrams.entry(bigram).or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: FrequencyTables) {
        for (token, count) in other.unigrams {
            *self.unigrams.entry(token).or_insert(0) += count;
        }
        for (bigram, count) in other.bigrams {
            *self.bigrams.entry(bigram).or_insert(0) += count;
        }
    }

    /// Counts every token and every in-sentence adjacent pair. No boundary
    /// markers are added, so bigrams never span two sentences.
    pub fn train<S: AsRef<str>>(sentences: &[S]) -> FrequencyTables {
        let mut tables = FrequencyTables::default();
        for sentence in sentences {
            tables.feed(sentence.as_ref());
        }
        info!(
            sentences = sentences.len(),
            vocabulary = tables.vocabulary_size(),
            bigram_types = tables.bigram_types(),
            "trained frequency tables"
        );
        tables
    }

    /// Same result as [`FrequencyTables::train`], counted over `num_threads`
    /// contiguous chunks of the corpus and summed afterwards.
    pub fn train_multi<S: AsRef<str> + Sync>(sentences: &[S], num_threads: usize) -> FrequencyTables {
        if num_threads <= 1 {
            return FrequencyTables::train(sentences);
        }

        let f_thread = |chunk: &[S]| -> FrequencyTables {
            let mut partial = FrequencyTables::default();
            for sentence in chunk {
                partial.feed(sentence.as_ref());
            }
            partial
        };

        let partials = multi_thread_process_list(sentences, num_threads, f_thread);
        debug!(chunks = partials.len(), "merging partial frequency tables");

        let mut tables = FrequencyTables::default();
        for partial in partials {
            tables.merge(partial);
        }
        info!(
            sentences = sentences.len(),
            threads = num_threads,
            vocabulary = tables.vocabulary_size(),
            bigram_types = tables.bigram_types(),
            "trained frequency tables"
        );
        tables
    }

    pub fn unigrams(&self) -> &UnigramTable {
        &self.unigrams
    }

    pub fn bigrams(&self) -> &BigramTable {
        &self.bigrams
    }

    pub fn unigram_count(&self, token: &str) -> usize {
        self.unigrams.get(token).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, first: &str, second: &str) -> usize {
        self.bigrams
            .get(&(String::from(first), String::from(second)))
            .copied()
            .unwrap_or(0)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.unigrams.len()
    }

    pub fn bigram_types(&self) -> usize {
        self.bigrams.len()
    }
}

impl BigramVocabulary for FrequencyTables {
    fn contains_bigram(&self, first: &str, second: &str) -> bool {
        self.bigrams
            .contains_key(&(String::from(first), String::from(second)))
    }
}
