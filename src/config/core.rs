use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutConfig;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
}

/// Where the tensor table and the per-model configuration records live.
/// Both accept local paths or `http(s)://` URLs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DataSettings {
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_configs")]
    pub configs: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LayoutSettings {
    #[serde(default = "default_min_size")]
    pub disk_min_size: f32,
    #[serde(default = "default_max_size")]
    pub disk_max_size: f32,
    #[serde(default = "default_thickness")]
    pub disk_thickness: f32,
    #[serde(default = "default_spacing")]
    pub spacing_multiplier: f32,
    #[serde(default)]
    pub start_position: [f32; 3],
    #[serde(default = "default_direction")]
    pub direction: [f32; 3],
    #[serde(default)]
    pub default_model: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            table: default_table(),
            configs: default_configs(),
        }
    }
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            disk_min_size: default_min_size(),
            disk_max_size: default_max_size(),
            disk_thickness: default_thickness(),
            spacing_multiplier: default_spacing(),
            start_position: [0.0; 3],
            direction: default_direction(),
            default_model: None,
        }
    }
}

impl LayoutSettings {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            min_size: self.disk_min_size,
            max_size: self.disk_max_size,
            thickness: self.disk_thickness,
            spacing_multiplier: self.spacing_multiplier,
            origin: Vec3::from_array(self.start_position),
            direction: Vec3::from_array(self.direction),
        }
    }
}

/// Loads configuration from layered TOML files. Later files override earlier
/// ones key by key; missing files are an error, missing keys fall back to
/// defaults.
pub fn load_app_config(paths: &[impl AsRef<Path>]) -> Result<AppConfig> {
    let mut merged = toml::Table::new();
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let table: toml::Table = text
            .parse()
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        merge_tables(&mut merged, table);
    }

    AppConfig::deserialize(toml::Value::Table(merged)).context("invalid configuration")
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn default_table() -> String {
    "data/model_info.arrow".to_string()
}

fn default_configs() -> String {
    "data/config_list.jsonl".to_string()
}

fn default_min_size() -> f32 {
    100.0
}

fn default_max_size() -> f32 {
    2000.0
}

fn default_thickness() -> f32 {
    40.0
}

fn default_spacing() -> f32 {
    2.0
}

fn default_direction() -> [f32; 3] {
    [-1.0, 0.0, 0.0]
}
