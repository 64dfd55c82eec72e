//! Prompt tokenizer
//!
//! Turns the free-text prompt into a flat list of normalized tags and pulls
//! out inline `<lora:name:weight>` annotations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{parse_weight, Result};

/// A named, weighted LoRA adapter reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraRef {
    pub name: String,
    pub value: f64,
}

impl LoraRef {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self { name: name.into(), value }
    }
}

/// Inline LoRA annotation, `<lora:name:0.8>`
static LORA_REX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<lora:([\w_]+):([\d.]+)>").unwrap()
});

/// Emphasis brackets and escapes, stripped from tags
static PARENS_REX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\\/\[\](){}]+").unwrap()
});

/// Lowercase, unify separators and drop bracket characters
fn normalize(prompt: &str) -> String {
    let lowered = prompt
        .to_lowercase()
        .replace('，', ",")
        .replace(['-', '_'], " ");
    PARENS_REX.replace_all(&lowered, "").into_owned()
}

/// One comma-separated piece of a normalized prompt
enum Segment<'a> {
    Tag(&'a str),
    Lora { name: &'a str, weight: &'a str },
}

/// Classify the non-empty segments of a normalized prompt.
///
/// Segments with a colon are either LoRA annotations or weighted tags
/// (`quality:1.2`), in which case only the part before the colon is kept.
fn segments(normalized: &str) -> impl Iterator<Item = Segment<'_>> {
    normalized
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.find(':') {
            Some(idx) => match LORA_REX.captures(segment) {
                Some(caps) => Segment::Lora {
                    name: caps.get(1).map_or("", |m| m.as_str()),
                    weight: caps.get(2).map_or("", |m| m.as_str()),
                },
                None => Segment::Tag(&segment[..idx]),
            },
            None => Segment::Tag(segment),
        })
}

/// Split a prompt into tags and inline LoRA references.
///
/// Neither output list is deduplicated here.
pub fn parse_prompt(prompt: &str) -> Result<(Vec<String>, Vec<LoraRef>)> {
    let normalized = normalize(prompt);
    let mut tags = Vec::new();
    let mut loras = Vec::new();

    for segment in segments(&normalized) {
        match segment {
            Segment::Tag(tag) => tags.push(tag.to_string()),
            Segment::Lora { name, weight } => {
                loras.push(LoraRef::new(name, parse_weight("lora weight", weight)?));
            }
        }
    }

    Ok((tags, loras))
}

/// Tags only. LoRA annotations are skipped without reading their weights.
pub fn parse_tags(prompt: &str) -> Vec<String> {
    let normalized = normalize(prompt);
    segments(&normalized)
        .filter_map(|segment| match segment {
            Segment::Tag(tag) => Some(tag.to_string()),
            Segment::Lora { .. } => None,
        })
        .collect()
}
