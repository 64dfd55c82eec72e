//! Generation-parameter parsing for PromptLens
//!
//! Stable Diffusion front ends embed a free-text "parameters" block in the
//! images they write: the prompt, an optional negative prompt, and a trailing
//! `key: value` line with sampler settings. This crate recovers structured
//! data from that block.
//!
//! # Pipeline
//!
//! - **Splitter**: separates prompt, negative prompt and parameter line
//! - **Parameter tokenizer**: `key: value` pairs, `WxH` sizes split in two
//! - **Prompt tokenizer**: normalized tags and inline `<lora:name:weight>`
//! - **Reconciler**: legacy AddNet LoRA slots, then deduplication
//!
//! Parsing is a pure function of its input and safe to run in parallel; see
//! [`parse_many`].

pub mod config;
pub mod error;
pub mod format;
pub mod params;
pub mod pipeline;
pub mod prompt;
pub mod reconcile;
pub mod splitter;

pub use config::ParserConfig;
pub use error::{ParseError, Result};
pub use format::{human_readable_size, modified_date, parse_size};
pub use params::{parse_parameter_line, to_parameter_line, ParameterMap};
pub use pipeline::{parse_generation_parameters, parse_many, parse_with_config, GenerationParams};
pub use prompt::{parse_prompt, parse_tags, LoraRef};
pub use reconcile::{addnet_loras, dedup_loras, dedup_tags, unique_by};
pub use splitter::{split_blob, SplitBlob};
