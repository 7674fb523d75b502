use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, error};

use super::configs::{configs_from_json_array, parse_config_jsonl};
use super::inline::decode_payload;
use super::table::read_table_bytes;
use super::{ModelIndex, RawRow, build_index};
use crate::config::DataSettings;

/// Where one load's table and config data come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Fetch the Arrow IPC table and the JSONL configs from paths or URLs.
    Remote { table: String, configs: String },
    /// Decode both payloads from compressed base64url parameters.
    Inline { table: String, configs: String },
}

impl DataSource {
    /// Inline mode is selected exactly when both query parameters are
    /// present; otherwise the configured remote locations are used.
    pub fn from_params(
        table_param: Option<&str>,
        config_param: Option<&str>,
        settings: &DataSettings,
    ) -> Self {
        match (table_param, config_param) {
            (Some(table), Some(configs)) => Self::Inline {
                table: table.to_string(),
                configs: configs.to_string(),
            },
            _ => Self::Remote {
                table: settings.table.clone(),
                configs: settings.configs.clone(),
            },
        }
    }
}

/// Hook for a loading indicator. Called at the start and end of every load,
/// whether or not the load succeeds.
pub trait ProgressSink {
    fn loading_started(&self) {}
    fn loading_finished(&self) {}
}

pub struct NoopProgress;

impl ProgressSink for NoopProgress {}

/// Loads and indexes model data. Never fails: any ingestion error is logged
/// and degrades to an empty index.
pub fn load_model_index(source: &DataSource, progress: &dyn ProgressSink) -> ModelIndex {
    progress.loading_started();
    let index = match try_load(source) {
        Ok(index) => {
            debug!("loaded {} models", index.len());
            index
        }
        Err(err) => {
            error!("failed to load model data: {err:#}");
            ModelIndex::default()
        }
    };
    progress.loading_finished();
    index
}

fn try_load(source: &DataSource) -> Result<ModelIndex> {
    let (rows, configs) = match source {
        DataSource::Remote { table, configs } => {
            let table_bytes =
                fetch_bytes(table).with_context(|| format!("failed to fetch table {table}"))?;
            let rows = read_table_bytes(&table_bytes)
                .with_context(|| format!("failed to parse table {table}"))?;

            let config_bytes =
                fetch_bytes(configs).with_context(|| format!("failed to fetch configs {configs}"))?;
            let config_text = String::from_utf8_lossy(&config_bytes);
            (rows, parse_config_jsonl(&config_text))
        }
        DataSource::Inline { table, configs } => {
            let table_json =
                decode_payload(table).context("failed to decode inline table parameter")?;
            let config_json =
                decode_payload(configs).context("failed to decode inline config parameter")?;
            (
                rows_from_json_array(table_json),
                configs_from_json_array(config_json),
            )
        }
    };

    Ok(build_index(rows, configs))
}

fn rows_from_json_array(value: Value) -> Vec<RawRow> {
    let Value::Array(items) = value else {
        error!("table payload is not a JSON array");
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<RawRow>(item) {
            Ok(row) => rows.push(row),
            Err(err) => error!("table entry is not an object: {err}"),
        }
    }
    rows
}

fn fetch_bytes(location: &str) -> io::Result<Vec<u8>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let response = ureq::get(location)
            .call()
            .map_err(|err| io::Error::other(err.to_string()))?;

        let mut reader = response.into_reader();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents)?;
        Ok(contents)
    } else {
        fs::read(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inline_mode_requires_both_params() {
        let settings = DataSettings::default();
        let source = DataSource::from_params(Some("abc"), None, &settings);
        assert_eq!(
            source,
            DataSource::Remote {
                table: settings.table.clone(),
                configs: settings.configs.clone(),
            }
        );

        let source = DataSource::from_params(Some("abc"), Some("def"), &settings);
        assert_eq!(
            source,
            DataSource::Inline {
                table: "abc".to_string(),
                configs: "def".to_string(),
            }
        );
    }

    #[test]
    fn failed_load_degrades_to_empty_index() {
        let source = DataSource::Remote {
            table: "/definitely/not/here.arrow".to_string(),
            configs: "/definitely/not/here.jsonl".to_string(),
        };
        let index = load_model_index(&source, &NoopProgress);
        assert!(index.is_empty());
    }

    #[test]
    fn non_object_rows_are_skipped() {
        let rows = rows_from_json_array(json!([{"model_name": "m"}, "stray"]));
        assert_eq!(rows.len(), 1);
    }
}
