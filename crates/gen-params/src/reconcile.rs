//! Legacy AddNet reconciliation and deduplication
//!
//! Older sd-webui-additional-networks builds stored LoRAs as numbered key
//! triples in the parameter line instead of inline `<lora:...>` tags:
//!
//! ```text
//! AddNet Module 1: LoRA, AddNet Model 1: style(abc123), AddNet Weight A 1: 0.7
//! ```

use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use crate::error::{parse_weight, ParseError, Result};
use crate::params::ParameterMap;
use crate::prompt::LoraRef;

const ADDNET_MODULE: &str = "AddNet Module";

/// Weight used when an AddNet slot has no `Weight A` entry
const DEFAULT_ADDNET_WEIGHT: &str = "1";

/// Collect LoRA references from AddNet module/model/weight triples.
///
/// Slots whose module is not `LoRA` are ignored. A LoRA slot without a model
/// key is an error; a missing weight defaults to `1`.
pub fn addnet_loras(params: &ParameterMap) -> Result<Vec<LoraRef>> {
    let mut loras = Vec::new();

    for (key, module) in params {
        if !key.starts_with(ADDNET_MODULE) || !module.eq_ignore_ascii_case("lora") {
            continue;
        }

        let model_key = key.replace("Module", "Model");
        let model = params
            .get(&model_key)
            .ok_or_else(|| ParseError::MissingKey { key: model_key.clone() })?;

        let weight_key = key.replace("Module", "Weight A");
        let weight = params
            .get(&weight_key)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ADDNET_WEIGHT);

        debug!(slot = %key, model = %model, weight, "found AddNet LoRA");
        loras.push(LoraRef::new(model.as_str(), parse_weight(&weight_key, weight)?));
    }

    Ok(loras)
}

/// Keep the first item for each key, preserving order
pub fn unique_by<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

/// Deduplicate LoRAs by name
pub fn dedup_loras(loras: Vec<LoraRef>) -> Vec<LoraRef> {
    unique_by(loras, |lora| lora.name.clone())
}

/// Deduplicate tags by exact text
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    unique_by(tags, String::clone)
}
