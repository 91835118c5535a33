use std::path::Path;

use csv::{Reader, Writer};
use itertools::Itertools;
use tracing::info;

use crate::error::{Result, SurprisalError};
use crate::n_gram::SurprisalModel;
use crate::types::SurprisalMap;

const MODEL_HEADER: [&str; 3] = ["First", "Second", "Surprisal"];

impl SurprisalModel {
    // First,Second,Surprisal
    // the,cat,0.5849625007211562
    pub fn save(&self, file_name: &Path) -> Result<()> {
        info!(path = %file_name.display(), entries = self.len(), "saving surprisal model");
        let mut writer = Writer::from_path(file_name)?;
        writer.write_record(MODEL_HEADER)?;
        // sorted so the same model always produces the same file
        let rows = self
            .surprisals
            .iter()
            .sorted_by(|(k1, _), (k2, _)| k1.cmp(k2));
        for ((w1, w2), value) in rows {
            let value_s = value.to_string();
            writer.write_record([w1.as_str(), w2.as_str(), value_s.as_str()])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn load(file_name: &Path) -> Result<SurprisalModel> {
        let mut reader = Reader::from_path(file_name)?;
        let mut surprisals = SurprisalMap::new();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            // header is row 1
            let row = i + 2;
            let malformed = |reason: String| SurprisalError::MalformedModel { row, reason };
            if record.len() != MODEL_HEADER.len() {
                return Err(malformed(format!("expected 3 fields, found {}", record.len())).into());
            }
            let value = record[2]
                .parse::<f64>()
                .map_err(|e| malformed(format!("surprisal {:?}: {}", &record[2], e)))?;
            if !value.is_finite() || value < 0.0 {
                return Err(malformed(format!("surprisal {} is not a finite non-negative number", value)).into());
            }
            surprisals.insert((String::from(&record[0]), String::from(&record[1])), value);
        }
        info!(path = %file_name.display(), entries = surprisals.len(), "loaded surprisal model");
        Ok(SurprisalModel { surprisals })
    }
}
