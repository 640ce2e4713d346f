//! Layered run configuration.
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. `triplet.toml` in the working directory
//! 3. `TRIPLET_*` environment variables (`TRIPLET_FILE_NAME` -> `file_name`)

use std::path::{Path, PathBuf};
use std::str::FromStr;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::ExperimentError;

pub const CONFIG_FILE: &str = "triplet.toml";
pub const ENV_PREFIX: &str = "TRIPLET_";
pub const DEFAULT_FILE_NAME: &str = "experiment_data.csv";
pub const DEFAULT_THANK_YOU: &str = "Thank you for participating!";

/// Which of the bundled experiments to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentKind {
    /// Text buttons, scored, results POSTed to the endpoint
    #[default]
    Words,
    /// Image buttons, results saved as CSV
    Images,
    /// Practice, blocked image triples and a one-word descriptor task,
    /// saved as a task log
    Textures,
}

impl FromStr for ExperimentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "words" => Ok(Self::Words),
            "images" => Ok(Self::Images),
            "textures" => Ok(Self::Textures),
            other => Err(format!(
                "unknown experiment `{other}` (expected words, images or textures)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub experiment: ExperimentKind,
    /// Spreadsheet endpoint receiving the JSON payload
    pub endpoint_url: Option<String>,
    pub output_dir: PathBuf,
    pub file_name: String,
    /// Append a random four digit suffix to the CSV file name
    pub unique_file_name: bool,
    pub thank_you: String,
    /// Textures: number of `img/imgN.png` stimuli
    pub stimulus_count: u32,
    /// Textures: main trials per block
    pub block_size: usize,
    /// Textures: training trials before the first block
    pub practice_trials: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentKind::default(),
            endpoint_url: None,
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            unique_file_name: false,
            thank_you: DEFAULT_THANK_YOU.to_string(),
            stimulus_count: 10,
            block_size: 20,
            practice_trials: 5,
        }
    }
}

impl ExperimentConfig {
    pub fn load() -> Result<Self, ExperimentError> {
        Ok(Self::figment(Path::new(CONFIG_FILE)).extract()?)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }
}
