use tracing::debug;

use crate::ingest::ModelIndex;
use crate::layout::{LayoutConfig, ModelLayout, layout_model};
use crate::panel::{format_config_panel, format_layer_panel};

/// Session state the presentation layer drives: which model is shown, which
/// disk is selected, and the panel text both map to. Holds the loaded index
/// read-only; every model selection recomputes the layout from scratch.
pub struct Viewer {
    index: ModelIndex,
    layout_config: LayoutConfig,
    active: Option<ActiveModel>,
}

struct ActiveModel {
    name: String,
    layout: ModelLayout,
    selected: Option<usize>,
}

impl Viewer {
    pub fn new(index: ModelIndex, layout_config: LayoutConfig) -> Self {
        Self {
            index,
            layout_config,
            active: None,
        }
    }

    pub fn index(&self) -> &ModelIndex {
        &self.index
    }

    pub fn active_model(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name.as_str())
    }

    pub fn active_layout(&self) -> Option<&ModelLayout> {
        self.active.as_ref().map(|active| &active.layout)
    }

    pub fn selected_disk(&self) -> Option<usize> {
        self.active.as_ref().and_then(|active| active.selected)
    }

    /// Selects the preferred model when the index has it, else the first
    /// model in iteration order. Returns `None` on an empty index.
    pub fn select_default(&mut self, preferred: Option<&str>) -> Option<&ModelLayout> {
        let name = self.index.default_or_first(preferred)?.to_string();
        self.select_model(&name)
    }

    /// Recomputes the layout for `name` and makes it the active model.
    /// Unknown names are a no-op.
    pub fn select_model(&mut self, name: &str) -> Option<&ModelLayout> {
        let entry = self.index.get(name)?;
        debug!("rendering model `{name}` with {} tensors", entry.tensors.len());
        let layout = layout_model(&entry.tensors, &self.layout_config);
        self.active = Some(ActiveModel {
            name: name.to_string(),
            layout,
            selected: None,
        });
        self.active_layout()
    }

    /// The hover label for a disk: its tensor name.
    pub fn hover_text(&self, disk: usize) -> Option<&str> {
        let active = self.active.as_ref()?;
        active
            .layout
            .placements
            .get(disk)
            .map(|placement| placement.name.as_str())
    }

    /// Selects a disk and returns the layer panel text for it.
    pub fn select_disk(&mut self, disk: usize) -> Option<String> {
        let active = self.active.as_mut()?;
        let entry = self.index.get(&active.name)?;
        let record = entry.tensors.get(disk)?;
        active.selected = Some(disk);
        Some(format_layer_panel(record))
    }

    /// Drops any disk selection and returns the model-configuration panel
    /// text for the active model.
    pub fn clear_selection(&mut self) -> String {
        let Some(active) = self.active.as_mut() else {
            return format_config_panel(None);
        };
        active.selected = None;
        let config = self
            .index
            .get(&active.name)
            .and_then(|entry| entry.config.as_ref());
        format_config_panel(config)
    }

    /// Moves the selection to the previous/next disk, clamped at both ends,
    /// and returns the updated panel text. No-op without a selection.
    pub fn step_selection(&mut self, delta: isize) -> Option<String> {
        let active = self.active.as_ref()?;
        let current = active.selected?;
        let disk_count = active.layout.placements.len();
        if disk_count == 0 {
            return None;
        }
        let stepped = current
            .saturating_add_signed(delta)
            .min(disk_count - 1);
        self.select_disk(stepped)
    }
}
