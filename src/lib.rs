pub mod config;
pub mod ingest;
pub mod layout;
pub mod panel;
pub mod viewer;

pub use config::{AppConfig, DataSettings, LayoutSettings, load_app_config};
pub use ingest::{
    DataSource, ModelConfig, ModelEntry, ModelIndex, NoopProgress, ProgressSink, TensorRecord,
    build_index, load_model_index,
};
pub use ingest::inline::{decode_payload, encode_payload};
pub use layout::{
    Color, DiskPlacement, LayoutConfig, LayoutSession, ModelLayout, clean_layer_name, layout_model,
};
pub use panel::{format_config_panel, format_layer_panel};
pub use viewer::Viewer;
