pub mod configs;
pub mod index;
pub mod inline;
pub mod loader;
pub mod table;

use indexmap::IndexMap;
use serde_json::Value;

pub use index::build_index;
pub use loader::{DataSource, NoopProgress, ProgressSink, load_model_index};

/// One ingested row of the tensor table, after field normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorRecord {
    pub model_name: String,
    /// Fully qualified tensor name (source column `param_name`).
    pub name: String,
    pub numel: u64,
    pub shape: Vec<u64>,
    /// Source row id; establishes the stable display order within a model.
    pub id: i64,
    /// Remaining source fields, in source column order, untouched.
    pub extra: IndexMap<String, Value>,
}

/// Arbitrary per-model configuration record. The schema is not fixed, so the
/// record stays an opaque ordered key/value mapping.
pub type ModelConfig = IndexMap<String, Value>;

/// A raw table row before normalization: source fields in column order.
pub type RawRow = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelEntry {
    pub tensors: Vec<TensorRecord>,
    pub config: Option<ModelConfig>,
}

/// Mapping from model name to its tensor list and configuration. Built once
/// per data load; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelIndex {
    models: IndexMap<String, ModelEntry>,
}

impl ModelIndex {
    pub(crate) fn new(models: IndexMap<String, ModelEntry>) -> Self {
        Self { models }
    }

    pub fn get(&self, model_name: &str) -> Option<&ModelEntry> {
        self.models.get(model_name)
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelEntry)> {
        self.models.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The preferred model when it exists in the index, else the first model
    /// in iteration order.
    pub fn default_or_first(&self, preferred: Option<&str>) -> Option<&str> {
        if let Some(name) = preferred
            && self.models.contains_key(name)
        {
            return Some(self.models.get_key_value(name)?.0);
        }
        self.models.keys().next().map(String::as_str)
    }
}
