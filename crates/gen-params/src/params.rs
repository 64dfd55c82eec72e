//! Parameter-line tokenizer
//!
//! The last line of a generation blob is a comma-separated list of
//! `key: value` pairs, e.g.
//!
//! ```text
//! Steps: 20, Sampler: Euler a, CFG scale: 7, Seed: 1234, Size: 512x768
//! ```
//!
//! Values may be double-quoted when they contain commas. `WxH` values are
//! split into `<key>-1` (width) and `<key>-2` (height).

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Key/value pairs recovered from the parameter line, in first-seen order.
/// Re-inserting a key replaces its value but keeps its position.
pub type ParameterMap = IndexMap<String, String>;

/// One `key: value` entry, value either quoted or running to the next comma
static PARAM_REX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s*([\w ]+):\s*("(?:\\"[^,]|\\"|\\|[^"])+"|[^,]*)(?:,|$)"#).unwrap()
});

/// Image dimensions, `512x768`
static IMAGE_SIZE_REX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)x(\d+)$").unwrap()
});

/// Count how many `key: value` entries a line contains
pub fn count_pairs(line: &str) -> usize {
    PARAM_REX.find_iter(line).count()
}

/// Tokenize a parameter line into a [`ParameterMap`].
///
/// Fragments that do not fit the grammar are skipped. Later duplicates of a
/// key overwrite earlier ones.
pub fn parse_parameter_line(line: &str) -> ParameterMap {
    let mut params = ParameterMap::new();

    for caps in PARAM_REX.captures_iter(line) {
        let key = &caps[1];
        let value = unquote(&caps[2]);

        if let Some(size) = IMAGE_SIZE_REX.captures(value) {
            params.insert(format!("{}-1", key), size[1].to_string());
            params.insert(format!("{}-2", key), size[2].to_string());
        } else {
            params.insert(key.to_string(), value.to_string());
        }
    }

    trace!(entries = params.len(), "tokenized parameter line");
    params
}

/// Strip one pair of surrounding double quotes. Escapes are left as-is.
/// A lone `"` unquotes to an empty value.
fn unquote(value: &str) -> &str {
    if value == "\"" {
        return "";
    }
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Serialize a map back into parameter-line form.
///
/// Split dimension keys (`Size-1`, `Size-2`) are joined back into
/// `Size: 512x768`. Values containing a comma are quoted. Values must not
/// contain double quotes for the output to reparse to the same map.
pub fn to_parameter_line(params: &ParameterMap) -> String {
    let mut entries = Vec::with_capacity(params.len());

    for (key, value) in params {
        if let Some(base) = key.strip_suffix("-1") {
            if let Some((width, height)) = split_dimension(params, base) {
                entries.push(format!("{}: {}x{}", base, width, height));
                continue;
            }
        }
        if let Some(base) = key.strip_suffix("-2") {
            if split_dimension(params, base).is_some() {
                continue;
            }
        }

        if value.contains(',') {
            entries.push(format!("{}: \"{}\"", key, value));
        } else {
            entries.push(format!("{}: {}", key, value));
        }
    }

    entries.join(", ")
}

/// Width and height stored under `<base>-1` / `<base>-2`, if both are numeric
fn split_dimension<'a>(params: &'a ParameterMap, base: &str) -> Option<(&'a str, &'a str)> {
    let is_number = |v: &str| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit());
    let width = params.get(&format!("{}-1", base))?;
    let height = params.get(&format!("{}-2", base))?;
    (is_number(width.as_str()) && is_number(height.as_str()))
        .then_some((width.as_str(), height.as_str()))
}
