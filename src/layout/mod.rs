pub mod engine;
pub mod palette;

pub use engine::{
    DiskPlacement, LayoutConfig, LayoutSession, ModelLayout, clean_layer_name, layout_model,
};
pub use palette::{Color, FALLBACK_COLOR, PALETTE_LEN, palette_color};
