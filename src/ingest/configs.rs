use serde_json::Value;
use tracing::error;

use super::ModelConfig;

/// Parses line-delimited JSON config records. Unparseable lines are skipped
/// and logged; parsing continues with the next line.
pub fn parse_config_jsonl(text: &str) -> Vec<ModelConfig> {
    let mut configs = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ModelConfig>(line) {
            Ok(config) => configs.push(config),
            Err(err) => error!("failed to parse config line: {err}"),
        }
    }
    configs
}

/// Converts a decoded JSON array into config records, skipping non-object
/// elements with a log entry.
pub fn configs_from_json_array(value: Value) -> Vec<ModelConfig> {
    let Value::Array(items) = value else {
        error!("config payload is not a JSON array");
        return Vec::new();
    };

    let mut configs = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<ModelConfig>(item) {
            Ok(config) => configs.push(config),
            Err(err) => error!("config entry is not an object: {err}"),
        }
    }
    configs
}
