//! End-to-end parsing of a generation-parameter blob

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::params::{parse_parameter_line, ParameterMap};
use crate::prompt::{parse_prompt, parse_tags, LoraRef};
use crate::reconcile::{addnet_loras, dedup_loras, dedup_tags};
use crate::splitter::split_blob;

/// Everything recovered from one metadata blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// `key: value` pairs from the parameter line, dimensions split
    pub parameters: ParameterMap,
    /// Inline and AddNet LoRAs, deduplicated by name
    pub loras: Vec<LoraRef>,
    /// Positive prompt tags, deduplicated
    pub tags: Vec<String>,
    /// Negative prompt tags; empty unless explicitly enabled in [`ParserConfig`]
    pub negative_tags: Vec<String>,
    /// Positive prompt text as written
    pub prompt: String,
    /// Negative prompt text as written
    pub negative_prompt: String,
}

impl GenerationParams {
    /// Split into `(parameters, loras, tags, negative_tags)`
    pub fn into_parts(self) -> (ParameterMap, Vec<LoraRef>, Vec<String>, Vec<String>) {
        (self.parameters, self.loras, self.tags, self.negative_tags)
    }

    /// Look up a single parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Image width and height from the `Size` parameter, if present
    pub fn size(&self) -> Option<(u32, u32)> {
        let width = self.get("Size-1")?.parse().ok()?;
        let height = self.get("Size-2")?.parse().ok()?;
        Some((width, height))
    }
}

/// Parse a metadata blob with the default configuration
pub fn parse_generation_parameters(text: &str) -> Result<GenerationParams> {
    parse_with_config(text, &ParserConfig::default())
}

/// Parse a metadata blob.
///
/// Malformed input degrades to partial results. Errors are returned only for
/// an AddNet slot without a model or for a non-numeric LoRA weight.
pub fn parse_with_config(text: &str, config: &ParserConfig) -> Result<GenerationParams> {
    let blob = split_blob(text, config);
    let parameters = parse_parameter_line(blob.parameter_line);

    let (tags, mut loras) = parse_prompt(&blob.prompt)?;
    loras.extend(addnet_loras(&parameters)?);

    let negative_tags = if config.extract_negative_tags {
        parse_tags(&blob.negative_prompt)
    } else {
        Vec::new()
    };

    let result = GenerationParams {
        parameters,
        loras: dedup_loras(loras),
        tags: dedup_tags(tags),
        negative_tags: dedup_tags(negative_tags),
        prompt: blob.prompt,
        negative_prompt: blob.negative_prompt,
    };

    debug!(
        parameters = result.parameters.len(),
        loras = result.loras.len(),
        tags = result.tags.len(),
        "parsed generation parameters"
    );
    Ok(result)
}

/// Parse many blobs in parallel. Results are in input order.
pub fn parse_many<S>(texts: &[S], config: &ParserConfig) -> Vec<Result<GenerationParams>>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| parse_with_config(text.as_ref(), config))
        .collect()
}
