use std::fmt;
use std::fs;
use std::path::Path;

use csv::Writer;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::filter::EligibleSentence;
use crate::n_gram::SurprisalModel;
use crate::types::Token;
use crate::util::bigrams;

pub const CSV_HEADER: [&str; 2] = ["Sentence", "Surprisal"];

/// Mean surprisal over the sentence's bigrams, or `None` when it has fewer
/// than two tokens.
pub fn average_surprisal(tokens: &[Token], model: &SurprisalModel, default_surprisal: f64) -> Option<f64> {
    let pairs = bigrams(tokens);
    if pairs.is_empty() {
        return None;
    }
    let total: f64 = pairs
        .iter()
        .map(|bigram| model.lookup_or(bigram, default_surprisal))
        .sum();
    Some(total / pairs.len() as f64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentenceRecord {
    // 1-based, in selection order
    pub index: usize,
    pub text: String,
    pub surprisal: Option<f64>,
}

impl SentenceRecord {
    pub fn csv_sentence(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn csv_surprisal(&self) -> String {
        self.surprisal.map(|s| s.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    QuotaFilled,
    // the test corpus ran out first, not an error
    CorpusExhausted { found: usize, quota: usize },
}

impl fmt::Display for SelectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionOutcome::QuotaFilled => write!(f, "quota filled"),
            SelectionOutcome::CorpusExhausted { found, quota } => {
                write!(f, "test corpus exhausted after {} of {} sentences", found, quota)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub records: Vec<SentenceRecord>,
    pub outcome: SelectionOutcome,
}

pub struct Selector<'m> {
    model: &'m SurprisalModel,
    quota: usize,
    default_surprisal: f64,
}

impl<'m> Selector<'m> {
    pub fn new(model: &'m SurprisalModel, quota: usize, default_surprisal: f64) -> Selector<'m> {
        Selector {
            model,
            quota,
            default_surprisal,
        }
    }

    pub fn score(&self, sentence: EligibleSentence, index: usize) -> SentenceRecord {
        let surprisal = average_surprisal(&sentence.tokens, self.model, self.default_surprisal);
        if surprisal.is_none() {
            warn!(index, "sentence has no bigrams, recording it without a score");
        }
        SentenceRecord {
            index,
            text: sentence.text,
            surprisal,
        }
    }

    /// Pulls eligible sentences until the quota is met or the source runs dry.
    /// Nothing past the last selected sentence is pulled.
    pub fn select<I>(&self, sentences: I) -> Result<Selection>
    where
        I: IntoIterator<Item = Result<EligibleSentence>>,
    {
        let mut records = Vec::with_capacity(self.quota);
        if self.quota == 0 {
            return Ok(Selection {
                records,
                outcome: SelectionOutcome::QuotaFilled,
            });
        }

        for sentence in sentences {
            let record = self.score(sentence?, records.len() + 1);
            debug!(index = record.index, surprisal = ?record.surprisal, "selected sentence");
            records.push(record);
            if records.len() == self.quota {
                info!(quota = self.quota, "selection quota filled");
                return Ok(Selection {
                    records,
                    outcome: SelectionOutcome::QuotaFilled,
                });
            }
        }

        let outcome = SelectionOutcome::CorpusExhausted {
            found: records.len(),
            quota: self.quota,
        };
        warn!(found = records.len(), quota = self.quota, "test corpus exhausted before the quota was filled");
        Ok(Selection { records, outcome })
    }
}

/// Writes `<index>.txt` per record and the `Sentence,Surprisal` table, keeping
/// row `n` of the csv aligned with `n.txt`.
pub fn write_artifacts(records: &[SentenceRecord], directory: &Path, csv_name: &str) -> Result<()> {
    fs::create_dir_all(directory)?;

    for record in records {
        let path = directory.join(format!("{}.txt", record.index));
        fs::write(&path, &record.text)?;
    }

    let csv_path = directory.join(csv_name);
    let mut writer = Writer::from_path(&csv_path)?;
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([record.csv_sentence(), record.csv_surprisal()])?;
    }
    writer.flush()?;
    info!(path = %csv_path.display(), rows = records.len(), "wrote surprisal table");
    Ok(())
}
