//! =============================================================================
//! Configuration And Settings
//! =============================================================================
//!
//! Owns every user facing knob of the using formatter (priority table, group
//! splitting, unused removal, padding, namespace relocation) and exposes the
//! typed snapshot the pipeline consumes on each run.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Upper bound for the blank-line counts; larger settings are clamped.
pub const MAX_EMPTY_LINES: usize = u16::MAX as usize;

/// Priority list used when the host supplies none.
pub const DEFAULT_SORT_ORDER: &str = "System Microsoft";

/// Immutable options snapshot for one formatting run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    /// Namespace prefixes ranked above plain alphabetical order; earlier wins.
    #[serde(deserialize_with = "deserialize_sort_order")]
    pub sort_order: Vec<String>,
    /// Separate runs of different root namespaces with a blank line.
    pub split_groups: bool,
    /// Drop directives the C# service reports as CS8019.
    pub remove_unnecessary_usings: bool,
    pub num_empty_lines_after_usings: usize,
    pub num_empty_lines_before_usings: usize,
    /// Move the block to just inside the first namespace declaration.
    pub usings_within_namespace: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            sort_order: parse_sort_order(DEFAULT_SORT_ORDER),
            split_groups: true,
            remove_unnecessary_usings: true,
            num_empty_lines_after_usings: 1,
            num_empty_lines_before_usings: 1,
            usings_within_namespace: false,
        }
    }
}

/// Splits a space separated priority list.  Empty tokens (double spaces) are
/// dropped so they never act as a match-everything prefix.
pub fn parse_sort_order(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

fn sort_order_from_value(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(text) => Some(parse_sort_order(text)),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str())
                .flat_map(parse_sort_order)
                .collect(),
        ),
        Value::Null => Some(Vec::new()),
        _ => None,
    }
}

fn deserialize_sort_order<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    sort_order_from_value(&value)
        .ok_or_else(|| serde::de::Error::custom("sortOrder must be a string or string array"))
}

/// Configuration facade; hosts read a fresh [`FormatOptions`] clone per run and
/// push `workspace/didChangeConfiguration` payloads through
/// [`Config::apply_workspace_settings`].
#[derive(Debug, Default)]
pub struct Config {
    options: FormatOptions,
}

impl Config {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Clones the current options for a single formatting run.
    pub fn snapshot(&self) -> FormatOptions {
        self.options.clone()
    }

    /// Applies settings payloads to the cached options. Returns `true` when any
    /// recognized option changed.
    pub fn apply_workspace_settings(&mut self, settings: &Value) -> bool {
        apply_settings_tree(settings, &mut self.options)
    }
}

fn apply_settings_tree(value: &Value, options: &mut FormatOptions) -> bool {
    let mut changed = false;
    if let Some(map) = value.as_object() {
        changed |= options.update_from_map(map);

        for key in POSSIBLE_SETTING_ROOTS {
            if let Some(candidate) = map.get(*key) {
                changed |= apply_settings_tree(candidate, options);
            }
        }
    }
    changed
}

const POSSIBLE_SETTING_ROOTS: &[&str] = &[
    "csharpFormatUsings",
    "csharp-format-usings",
    "csharp_format_usings",
];

impl FormatOptions {
    fn update_from_map(&mut self, map: &Map<String, Value>) -> bool {
        let mut changed = false;

        if let Some(order) = map.get("sortOrder").and_then(sort_order_from_value) {
            if self.sort_order != order {
                self.sort_order = order;
                changed = true;
            }
        }

        changed |= update_bool(map, "splitGroups", &mut self.split_groups);
        changed |= update_bool(
            map,
            "removeUnnecessaryUsings",
            &mut self.remove_unnecessary_usings,
        );
        changed |= update_bool(
            map,
            "usingsWithinNamespace",
            &mut self.usings_within_namespace,
        );
        changed |= update_count(
            map,
            "numEmptyLinesAfterUsings",
            &mut self.num_empty_lines_after_usings,
        );
        changed |= update_count(
            map,
            "numEmptyLinesBeforeUsings",
            &mut self.num_empty_lines_before_usings,
        );

        changed
    }
}

fn update_bool(map: &Map<String, Value>, key: &str, slot: &mut bool) -> bool {
    match map.get(key).and_then(|v| v.as_bool()) {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

fn update_count(map: &Map<String, Value>, key: &str, slot: &mut usize) -> bool {
    let Some(value) = map.get(key) else {
        return false;
    };
    // Negative counts clamp to zero; fractional values truncate.
    let requested = match value.as_u64() {
        Some(n) => n,
        None => match value.as_f64() {
            Some(n) if n.is_finite() => n.max(0.0) as u64,
            _ => {
                log::warn!("ignoring non-numeric setting {key}: {value}");
                return false;
            }
        },
    };
    let count = match usize::try_from(requested) {
        Ok(n) if n <= MAX_EMPTY_LINES => n,
        _ => {
            log::warn!("clamping {key} from {requested} to {MAX_EMPTY_LINES}");
            MAX_EMPTY_LINES
        }
    };
    if *slot != count {
        *slot = count;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_extension_settings() {
        let options = FormatOptions::default();
        assert_eq!(options.sort_order, vec!["System", "Microsoft"]);
        assert!(options.split_groups);
        assert!(options.remove_unnecessary_usings);
        assert_eq!(options.num_empty_lines_after_usings, 1);
        assert_eq!(options.num_empty_lines_before_usings, 1);
        assert!(!options.usings_within_namespace);
    }

    #[test]
    fn apply_workspace_settings_reads_nested_roots() {
        let mut config = Config::default();
        let changed = config.apply_workspace_settings(&json!({
            "csharpFormatUsings": {
                "sortOrder": "Microsoft System Newtonsoft",
                "splitGroups": false,
                "numEmptyLinesAfterUsings": 2,
            }
        }));
        assert!(changed);
        let options = config.options();
        assert_eq!(options.sort_order, vec!["Microsoft", "System", "Newtonsoft"]);
        assert!(!options.split_groups);
        assert_eq!(options.num_empty_lines_after_usings, 2);
        assert_eq!(options.num_empty_lines_before_usings, 1);
    }

    #[test]
    fn apply_workspace_settings_reports_no_change_for_same_values() {
        let mut config = Config::default();
        let changed = config.apply_workspace_settings(&json!({
            "sortOrder": "System Microsoft",
            "splitGroups": true,
            "unrelated": 3,
        }));
        assert!(!changed);
    }

    #[test]
    fn sort_order_accepts_arrays_and_clamps_negative_counts() {
        let mut config = Config::default();
        config.apply_workspace_settings(&json!({
            "sortOrder": ["Acme", "System"],
            "numEmptyLinesBeforeUsings": -4,
        }));
        assert_eq!(config.options().sort_order, vec!["Acme", "System"]);
        assert_eq!(config.options().num_empty_lines_before_usings, 0);
    }

    #[test]
    fn oversized_counts_clamp_to_the_ceiling() {
        let mut config = Config::default();
        assert!(config.apply_workspace_settings(&json!({
            "numEmptyLinesAfterUsings": u64::MAX,
            "numEmptyLinesBeforeUsings": 1e12,
        })));
        assert_eq!(config.options().num_empty_lines_after_usings, MAX_EMPTY_LINES);
        assert_eq!(config.options().num_empty_lines_before_usings, MAX_EMPTY_LINES);
    }

    #[test]
    fn format_options_deserialize_with_defaults() {
        let options: FormatOptions = serde_json::from_value(json!({
            "sortOrder": "",
            "usingsWithinNamespace": true,
        }))
        .expect("options deserialize");
        assert!(options.sort_order.is_empty());
        assert!(options.usings_within_namespace);
        assert!(options.split_groups);
    }
}
