use glam::Vec3;
use indexmap::IndexMap;

use super::palette::{Color, FALLBACK_COLOR, PALETTE_LEN, palette_color};
use crate::ingest::TensorRecord;

/// Geometry knobs for one model's disk layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub min_size: f32,
    pub max_size: f32,
    pub thickness: f32,
    pub spacing_multiplier: f32,
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_size: 100.0,
            max_size: 2000.0,
            thickness: 40.0,
            spacing_multiplier: 2.0,
            origin: Vec3::ZERO,
            direction: Vec3::NEG_X,
        }
    }
}

/// One tensor rendered as a disk: log-scaled display size, position along
/// the layout axis, and the color shared by its cleaned name.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskPlacement {
    pub name: String,
    pub clean_name: String,
    pub size: f32,
    pub position: Vec3,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelLayout {
    pub placements: Vec<DiskPlacement>,
    pub total_extent: f32,
    pub center: Vec3,
}

impl ModelLayout {
    /// Camera distance that frames the whole stack comfortably.
    pub fn suggested_camera_radius(&self) -> f32 {
        self.total_extent * 1.5
    }
}

/// Owns the color-assignment table for a single layout call. Created fresh
/// per render and discarded afterwards, so color order never leaks between
/// models.
pub struct LayoutSession<'a> {
    config: &'a LayoutConfig,
    colors: IndexMap<String, Color>,
}

impl<'a> LayoutSession<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            colors: IndexMap::new(),
        }
    }

    /// First-seen cleaned names take palette slots in order; once the last
    /// slot is reached every further name shares the fallback color.
    fn assign_color(&mut self, clean_name: &str) -> Color {
        if let Some(color) = self.colors.get(clean_name) {
            return *color;
        }
        let slot = self.colors.len();
        let color = if slot + 1 >= PALETTE_LEN {
            FALLBACK_COLOR
        } else {
            palette_color(slot)
        };
        self.colors.insert(clean_name.to_string(), color);
        color
    }

    pub fn layout(mut self, tensors: &[TensorRecord]) -> ModelLayout {
        let config = self.config;
        let direction = normalized_direction(config.direction);
        let stride = config.thickness * config.spacing_multiplier;

        if tensors.is_empty() {
            return ModelLayout {
                placements: Vec::new(),
                total_extent: 0.0,
                center: config.origin,
            };
        }

        // ln(numel) bounds over the whole model; numel clamps to 1 so empty
        // tensors do not poison the interpolation.
        let logs: Vec<f64> = tensors
            .iter()
            .map(|tensor| (tensor.numel.max(1) as f64).ln())
            .collect();
        let log_min = logs.iter().copied().fold(f64::INFINITY, f64::min);
        let log_max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_span = log_max - log_min;

        let mut placements = Vec::with_capacity(tensors.len());
        let mut position = config.origin;
        for (tensor, log_numel) in tensors.iter().zip(&logs) {
            let fraction = if log_span > 0.0 {
                ((log_numel - log_min) / log_span) as f32
            } else {
                0.0
            };
            let size = config.min_size + fraction * (config.max_size - config.min_size);

            let clean_name = clean_layer_name(&tensor.name);
            let color = self.assign_color(&clean_name);

            placements.push(DiskPlacement {
                name: tensor.name.clone(),
                clean_name,
                size,
                position,
                color,
            });

            // Fixed stride: the position advance does not depend on the
            // disk's display size.
            position += direction * stride;
        }

        let total_extent = stride * tensors.len() as f32;
        let center = config.origin + direction * (total_extent / 2.0);

        ModelLayout {
            placements,
            total_extent,
            center,
        }
    }
}

/// Lays out one model's tensors in their stable order.
pub fn layout_model(tensors: &[TensorRecord], config: &LayoutConfig) -> ModelLayout {
    LayoutSession::new(config).layout(tensors)
}

fn normalized_direction(direction: Vec3) -> Vec3 {
    let normalized = direction.normalize_or_zero();
    if normalized == Vec3::ZERO {
        Vec3::NEG_X
    } else {
        normalized
    }
}

/// Strips embedded numeric layer indices from a tensor name so related
/// tensors across blocks share a color: `h.25.attn.weight` → `h.attn.weight`.
/// Matches a non-overlapping left-to-right replacement of `.<digits>.` runs
/// with a single `.`.
pub fn clean_layer_name(name: &str) -> String {
    // The pattern is pure ASCII, so scanning bytes is safe as long as
    // unmatched regions are copied as str slices, keeping multi-byte
    // characters intact.
    let bytes = name.as_bytes();
    let mut out = String::with_capacity(name.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'.' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 && j < bytes.len() && bytes[j] == b'.' {
                out.push_str(&name[start..i]);
                out.push('.');
                i = j + 1;
                start = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&name[start..]);
    out
}
