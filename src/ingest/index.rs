use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{ModelConfig, ModelEntry, ModelIndex, RawRow, TensorRecord};

const MODEL_NAME: &str = "model_name";
const PARAM_NAME: &str = "param_name";
const NUMEL: &str = "numel";
const SHAPE: &str = "shape";
const ID: &str = "id";

/// Builds the per-model index from raw table rows and config records.
///
/// Rows lacking `model_name` are dropped (logged as errors), the rest are
/// stable-sorted by `id` and grouped by model in first-seen order. Configs
/// lacking `model_name` are skipped with a warning; the last config wins on
/// duplicate model names.
pub fn build_index(rows: Vec<RawRow>, configs: Vec<ModelConfig>) -> ModelIndex {
    let mut keyed: Vec<(i64, RawRow)> = Vec::with_capacity(rows.len());
    for row in rows {
        if model_name_of(&row).is_none() {
            error!("dropping row without model_name: {:?}", row.get(PARAM_NAME));
            continue;
        }
        keyed.push((coerce_i64(row.get(ID)), row));
    }
    keyed.sort_by_key(|(id, _)| *id);

    let mut models: IndexMap<String, ModelEntry> = IndexMap::new();
    for (id, row) in keyed {
        let record = normalize_row(id, row);
        models
            .entry(record.model_name.clone())
            .or_default()
            .tensors
            .push(record);
    }

    let mut config_map: IndexMap<String, ModelConfig> = IndexMap::new();
    for config in configs {
        let Some(name) = config.get(MODEL_NAME).and_then(Value::as_str) else {
            warn!("skipping config without model_name");
            continue;
        };
        config_map.insert(name.to_string(), config);
    }

    for (name, config) in config_map {
        match models.get_mut(&name) {
            Some(entry) => entry.config = Some(config),
            None => debug!("config for `{name}` has no tensor rows; ignoring"),
        }
    }

    ModelIndex::new(models)
}

/// Extracts the owning model name, stringifying non-string scalars. Empty
/// strings, zero, `false`, and null all count as absent.
fn model_name_of(row: &RawRow) -> Option<String> {
    match row.get(MODEL_NAME)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn normalize_row(id: i64, row: RawRow) -> TensorRecord {
    let model_name = model_name_of(&row).unwrap_or_default();

    let name = match row.get(PARAM_NAME).and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => {
            warn!("row in `{model_name}` lacks param_name");
            String::new()
        }
    };
    let numel = coerce_u64(row.get(NUMEL), &name);
    let shape = coerce_shape(row.get(SHAPE), &name);

    let mut extra = IndexMap::with_capacity(row.len());
    for (key, value) in row {
        match key.as_str() {
            MODEL_NAME | PARAM_NAME | NUMEL | SHAPE | ID => {}
            _ => {
                extra.insert(key, value);
            }
        }
    }

    TensorRecord {
        model_name,
        name,
        numel,
        shape,
        id,
        extra,
    }
}

fn coerce_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn coerce_u64(value: Option<&Value>, name: &str) -> u64 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!("tensor `{name}` has unparseable numel {value:?}; using 0");
        0
    })
}

fn coerce_shape(value: Option<&Value>, name: &str) -> Vec<u64> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s
            .split(',')
            .map(|part| {
                part.trim().parse().unwrap_or_else(|_| {
                    warn!("tensor `{name}` has unparseable shape component `{part}`; using 0");
                    0
                })
            })
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_u64().unwrap_or(0))
            .collect(),
        _ => Vec::new(),
    }
}
