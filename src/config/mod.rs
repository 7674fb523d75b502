mod core;

pub use core::{AppConfig, DataSettings, LayoutSettings, load_app_config};
