//! Configuration for the processor module.

use serde::{Deserialize, Serialize};

/// Configuration for the tree walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Maximum files processed at once. `1` is a strictly sequential walk.
    #[serde(default = "default_max_conversions")]
    pub max_parallel_conversions: usize,

    /// Probe and plan only; never transcode or delete.
    #[serde(default)]
    pub dry_run: bool,

    /// Follow symbolic links while walking the tree.
    #[serde(default)]
    pub follow_links: bool,

    /// Capacity of the discovery and outcome channels.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_max_conversions() -> usize {
    1
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_parallel_conversions: default_max_conversions(),
            dry_run: false,
            follow_links: false,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl ProcessorConfig {
    /// Sets the maximum parallel conversions.
    pub fn with_max_conversions(mut self, max: usize) -> Self {
        self.max_parallel_conversions = max;
        self
    }

    /// Enables dry run mode.
    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables following symbolic links.
    pub fn with_follow_links(mut self, enabled: bool) -> Self {
        self.follow_links = enabled;
        self
    }
}
