use std::{fmt::Debug, fs, path::Path, path::PathBuf, str::FromStr};

use json::JsonValue;

use crate::error::{ConfigError, Error, Result};

/*
Config file structure:
every section and every key is optional, missing values use the defaults below
{
    filter: {
        min_tokens: 15
    },
    scorer: {
        quota: 10,
        default_surprisal: 10.0
    },
    trainer: {
        threads: 1
    },
    output: {
        directory: "data/sentences",
        csv: "surprisal.csv"
    }
}
*/

fn get_json<T>(obj: &JsonValue, section: &str, key: &str, def: T) -> std::result::Result<T, ConfigError>
where
    T: FromStr,
    <T as FromStr>::Err: Debug,
{
    if !obj.has_key(key) {
        return Ok(def);
    }
    let value = &obj[key];
    let invalid = || ConfigError::InvalidValue {
        section: String::from(section),
        key: String::from(key),
        value: value.dump(),
    };
    if !value.is_number() {
        return Err(invalid());
    }
    value.dump().parse::<T>().map_err(|_| invalid())
}

fn get_json_str(obj: &JsonValue, section: &str, key: &str, def: String) -> std::result::Result<String, ConfigError> {
    if !obj.has_key(key) {
        return Ok(def);
    }
    obj[key]
        .as_str()
        .map(String::from)
        .ok_or_else(|| ConfigError::InvalidValue {
            section: String::from(section),
            key: String::from(key),
            value: obj[key].dump(),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    // Sentences with fewer tokens than this are never scored
    pub min_tokens: usize,
}

impl Default for FilterConfig {
    fn default() -> FilterConfig {
        FilterConfig { min_tokens: 15 }
    }
}

impl FilterConfig {
    pub fn from_json(obj: &JsonValue) -> std::result::Result<FilterConfig, ConfigError> {
        let mut tmp_config = FilterConfig::default();
        let filter_s = "filter";
        tmp_config.min_tokens = get_json(obj, filter_s, "min_tokens", tmp_config.min_tokens)?;
        Ok(tmp_config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    // Stop after this many sentences have been selected
    pub quota: usize,
    // Used for a bigram that has no trained surprisal
    pub default_surprisal: f64,
}

impl Default for ScorerConfig {
    fn default() -> ScorerConfig {
        ScorerConfig {
            quota: 10,
            default_surprisal: 10.0,
        }
    }
}

impl ScorerConfig {
    pub fn from_json(obj: &JsonValue) -> std::result::Result<ScorerConfig, ConfigError> {
        let mut tmp_config = ScorerConfig::default();
        let scorer_s = "scorer";
        tmp_config.quota = get_json(obj, scorer_s, "quota", tmp_config.quota)?;
        tmp_config.default_surprisal =
            get_json(obj, scorer_s, "default_surprisal", tmp_config.default_surprisal)?;
        Ok(tmp_config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub threads: usize,
}

impl Default for TrainerConfig {
    fn default() -> TrainerConfig {
        TrainerConfig { threads: 1 }
    }
}

impl TrainerConfig {
    pub fn from_json(obj: &JsonValue) -> std::result::Result<TrainerConfig, ConfigError> {
        let mut tmp_config = TrainerConfig::default();
        tmp_config.threads = get_json(obj, "trainer", "threads", tmp_config.threads)?;
        Ok(tmp_config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    // One <index>.txt per selected sentence plus the csv land here
    pub directory: PathBuf,
    pub csv: String,
}

impl Default for OutputConfig {
    fn default() -> OutputConfig {
        OutputConfig {
            directory: PathBuf::from("data/sentences"),
            csv: String::from("surprisal.csv"),
        }
    }
}

impl OutputConfig {
    pub fn from_json(obj: &JsonValue) -> std::result::Result<OutputConfig, ConfigError> {
        let defaults = OutputConfig::default();
        let output_s = "output";
        let directory = get_json_str(
            obj,
            output_s,
            "directory",
            defaults.directory.to_string_lossy().into_owned(),
        )?;
        let csv = get_json_str(obj, output_s, "csv", defaults.csv)?;
        Ok(OutputConfig {
            directory: PathBuf::from(directory),
            csv,
        })
    }

    pub fn csv_path(&self) -> PathBuf {
        self.directory.join(&self.csv)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub scorer: ScorerConfig,
    pub trainer: TrainerConfig,
    pub output: OutputConfig,
}

impl PipelineConfig {
    pub fn parse(contents: &str) -> std::result::Result<PipelineConfig, ConfigError> {
        if contents.trim().is_empty() {
            return Err(ConfigError::Empty);
        }
        let json_data = json::parse(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut config = PipelineConfig::default();

        let filter_s = "filter";
        if json_data.has_key(filter_s) {
            config.filter = FilterConfig::from_json(&json_data[filter_s])?;
        }

        let scorer_s = "scorer";
        if json_data.has_key(scorer_s) {
            config.scorer = ScorerConfig::from_json(&json_data[scorer_s])?;
        }

        let trainer_s = "trainer";
        if json_data.has_key(trainer_s) {
            config.trainer = TrainerConfig::from_json(&json_data[trainer_s])?;
        }

        let output_s = "output";
        if json_data.has_key(output_s) {
            config.output = OutputConfig::from_json(&json_data[output_s])?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn read_config(file_name: &Path) -> Result<PipelineConfig> {
        let file_contents = fs::read_to_string(file_name)?;
        PipelineConfig::parse(&file_contents).map_err(Error::from)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.scorer.quota == 0 {
            return Err(ConfigError::OutOfRange(String::from("scorer.quota must be at least 1")));
        }
        if self.filter.min_tokens < 2 {
            return Err(ConfigError::OutOfRange(String::from(
                "filter.min_tokens must be at least 2 so every sentence has a bigram",
            )));
        }
        if self.trainer.threads == 0 {
            return Err(ConfigError::OutOfRange(String::from("trainer.threads must be at least 1")));
        }
        let default = self.scorer.default_surprisal;
        if !default.is_finite() || default < 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "scorer.default_surprisal must be finite and non-negative, got {}",
                default
            )));
        }
        Ok(())
    }
}
