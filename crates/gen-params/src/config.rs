//! Parser configuration

use serde::{Deserialize, Serialize};

/// Marker that opens the negative-prompt section of a metadata blob
pub const NEGATIVE_PROMPT_MARKER: &str = "Negative prompt:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Minimum number of `key: value` pairs the last line needs before it is
    /// treated as the parameter line
    pub param_threshold: usize,
    /// Line prefix that switches the prompt region into the negative prompt
    pub negative_marker: String,
    /// Tokenize the negative prompt into tags as well (off by default)
    pub extract_negative_tags: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            // Steps, Sampler and CFG scale at minimum
            param_threshold: 3,
            negative_marker: NEGATIVE_PROMPT_MARKER.to_string(),
            extract_negative_tags: false,
        }
    }
}

impl ParserConfig {
    /// Enable or disable negative tag extraction
    pub fn with_negative_tags(mut self, enabled: bool) -> Self {
        self.extract_negative_tags = enabled;
        self
    }

    /// Override the parameter-line threshold
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.param_threshold = threshold;
        self
    }
}
