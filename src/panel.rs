use serde_json::Value;

use crate::ingest::{ModelConfig, TensorRecord};

/// Source fields that never show up in the info panel.
const HIDDEN_LAYER_FIELDS: [&str; 5] = ["id", "file_path", "is_shared", "param_name", "level"];

const LAYER_WRAP_WIDTH: usize = 40;
const CONFIG_WRAP_WIDTH: usize = 60;
const LAYER_SEPARATOR: &str = "\n------------------------------\n";
const CONFIG_SEPARATOR: &str = "\n-----------------------------\n";

const EMPTY_CONFIG_PLACEHOLDER: &str = "no configuration available";

/// Panel text for a selected disk: key/value lines for the tensor's display
/// fields, wrapped at 40 columns and joined by separator rules.
pub fn format_layer_panel(record: &TensorRecord) -> String {
    let mut entries: Vec<(&str, String)> = vec![
        ("model_name", record.model_name.clone()),
        ("name", record.name.clone()),
        ("numel", record.numel.to_string()),
        ("shape", format_value(&Value::from(record.shape.clone()))),
    ];
    for (key, value) in &record.extra {
        if HIDDEN_LAYER_FIELDS.contains(&key.as_str()) {
            continue;
        }
        entries.push((key, format_value(value)));
    }

    join_entries(&entries, LAYER_WRAP_WIDTH, LAYER_SEPARATOR)
}

/// Panel text for the model-configuration view, shown when no disk is
/// selected. An absent config renders a placeholder rather than failing.
pub fn format_config_panel(config: Option<&ModelConfig>) -> String {
    let Some(config) = config else {
        return EMPTY_CONFIG_PLACEHOLDER.to_string();
    };

    let entries: Vec<(&str, String)> = config
        .iter()
        .map(|(key, value)| (key.as_str(), format_value(value)))
        .collect();
    join_entries(&entries, CONFIG_WRAP_WIDTH, CONFIG_SEPARATOR)
}

fn join_entries(entries: &[(&str, String)], width: usize, separator: &str) -> String {
    entries
        .iter()
        .map(|(key, value)| wrap_text(&format!("{key}: {value}"), width))
        .collect::<Vec<_>>()
        .join(separator)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

/// Greedy word wrap: a word that would push the current line past `width`
/// starts a new line. Width is measured in characters, not bytes. Newlines
/// inside a value (pretty-printed JSON) pass through untouched.
fn wrap_text(text: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;
    for word in text.split(' ') {
        if current_chars + word.chars().count() > width {
            lines.push(current.trim_end().to_string());
            current.clear();
            current_chars = 0;
        }
        current.push_str(word);
        current.push(' ');
        current_chars += word.chars().count() + 1;
    }
    if !current.trim().is_empty() || lines.is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines.join("\n")
}
