//! Splits a metadata blob into prompt, negative prompt and parameter line
//!
//! Layout written by the web UIs:
//!
//! ```text
//! <prompt>
//! ...
//! Negative prompt: <negative prompt>
//! ...
//! Steps: 20, Sampler: Euler a, CFG scale: 7, ...
//! ```

use tracing::debug;

use crate::config::ParserConfig;
use crate::params::count_pairs;

/// The three regions of a metadata blob
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitBlob<'a> {
    pub prompt: String,
    pub negative_prompt: String,
    /// Empty when the last line did not look like a parameter line
    pub parameter_line: &'a str,
}

/// Split a metadata blob into its regions.
///
/// The last line only counts as the parameter line when it holds at least
/// `config.param_threshold` `key: value` pairs; otherwise the whole blob is
/// prompt text.
pub fn split_blob<'a>(text: &'a str, config: &ParserConfig) -> SplitBlob<'a> {
    let mut lines: Vec<&str> = text.trim().split('\n').collect();

    let mut parameter_line = "";
    if let Some(&last) = lines.last() {
        let pairs = count_pairs(last);
        if pairs >= config.param_threshold {
            parameter_line = last;
            lines.pop();
        } else {
            debug!(
                pairs,
                threshold = config.param_threshold,
                "no parameter line, treating blob as prompt"
            );
        }
    }

    let mut prompt = String::new();
    let mut negative_prompt = String::new();
    let mut in_negative = false;

    for line in lines {
        let mut line = line.trim();
        if let Some(rest) = line.strip_prefix(config.negative_marker.as_str()) {
            in_negative = true;
            line = rest.trim();
        }

        let target = if in_negative { &mut negative_prompt } else { &mut prompt };
        if !target.is_empty() {
            target.push('\n');
        }
        target.push_str(line);
    }

    SplitBlob { prompt, negative_prompt, parameter_line }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> SplitBlob<'_> {
        split_blob(text, &ParserConfig::default())
    }

    #[test]
    fn test_prompt_and_parameters() {
        let blob = split("a cat, <lora:foo:0.8>\nSteps: 20, Size: 512x768, Sampler: Euler");
        assert_eq!(blob.prompt, "a cat, <lora:foo:0.8>");
        assert_eq!(blob.negative_prompt, "");
        assert_eq!(blob.parameter_line, "Steps: 20, Size: 512x768, Sampler: Euler");
    }

    #[test]
    fn test_negative_prompt() {
        let blob = split(
            "a cat\non a mat\nNegative prompt: blurry, low quality\nugly\n\
             Steps: 20, Sampler: Euler, Seed: 1",
        );
        assert_eq!(blob.prompt, "a cat\non a mat");
        assert_eq!(blob.negative_prompt, "blurry, low quality\nugly");
        assert_eq!(blob.parameter_line, "Steps: 20, Sampler: Euler, Seed: 1");
    }

    #[test]
    fn test_two_pairs_is_prompt() {
        let blob = split("a cat\nSteps: 20, Seed: 1");
        assert_eq!(blob.prompt, "a cat\nSteps: 20, Seed: 1");
        assert_eq!(blob.parameter_line, "");
    }

    #[test]
    fn test_three_pairs_is_parameter_line() {
        let blob = split("a cat\nSteps: 20, Seed: 1, CFG scale: 7");
        assert_eq!(blob.prompt, "a cat");
        assert_eq!(blob.parameter_line, "Steps: 20, Seed: 1, CFG scale: 7");
    }

    #[test]
    fn test_parameter_line_only() {
        let blob = split("Steps: 20, Seed: 1, CFG scale: 7\n");
        assert_eq!(blob.prompt, "");
        assert_eq!(blob.parameter_line, "Steps: 20, Seed: 1, CFG scale: 7");
    }

    #[test]
    fn test_empty_blob() {
        assert_eq!(split(""), SplitBlob::default());
        assert_eq!(split("  \n\t "), SplitBlob::default());
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let blob = split("a cat\nnegative prompt: dog\nSteps: 20, Seed: 1, CFG scale: 7");
        assert_eq!(blob.prompt, "a cat\nnegative prompt: dog");
        assert_eq!(blob.negative_prompt, "");
    }

    #[test]
    fn test_lines_trimmed() {
        let blob =
            split("  a cat  \r\n  Negative prompt:   dog  \r\nSteps: 20, Seed: 1, CFG scale: 7");
        assert_eq!(blob.prompt, "a cat");
        assert_eq!(blob.negative_prompt, "dog");
    }

    #[test]
    fn test_custom_threshold() {
        let config = ParserConfig::default().with_threshold(2);
        let blob = split_blob("a cat\nSteps: 20, Seed: 1", &config);
        assert_eq!(blob.prompt, "a cat");
        assert_eq!(blob.parameter_line, "Steps: 20, Seed: 1");
    }
}
