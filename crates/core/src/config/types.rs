use serde::{Deserialize, Serialize};

use crate::converter::ConverterConfig;
use crate::processor::ProcessorConfig;

/// Everything a sweep needs, assembled from the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
}

impl Config {
    pub fn new(converter: ConverterConfig, processor: ProcessorConfig) -> Self {
        Self {
            converter,
            processor,
        }
    }
}
