pub mod error;
pub mod filter;
pub mod n_gram;
pub mod pipeline;
pub mod scorer;
pub mod types;
pub mod util;

pub use error::{ConfigError, Error, Result, SurprisalError};
pub use n_gram::config::PipelineConfig;
pub use n_gram::{BigramVocabulary, FrequencyTables, SurprisalModel};
