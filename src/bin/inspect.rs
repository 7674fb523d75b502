use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::Parser;
use serde_json::Value;

use layerscape::{
    AppConfig, DataSource, ModelIndex, NoopProgress, Viewer, encode_payload, load_app_config,
    load_model_index,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config_paths: Vec<PathBuf> = Vec::new();
    let base = Path::new("config/base.toml");
    if base.is_file() {
        config_paths.push(base.to_path_buf());
    }
    config_paths.extend(args.config.clone());

    let config = if config_paths.is_empty() {
        AppConfig::default()
    } else {
        load_app_config(&config_paths)?
    };

    let mut data = config.data.clone();
    if let Some(table) = &args.table {
        data.table = table.clone();
    }
    if let Some(configs) = &args.configs {
        data.configs = configs.clone();
    }

    let source = DataSource::from_params(
        args.arrow_param.as_deref(),
        args.config_param.as_deref(),
        &data,
    );
    let index = load_model_index(&source, &NoopProgress);
    if index.is_empty() {
        println!("no models loaded");
        return Ok(());
    }

    if args.list {
        for name in index.model_names() {
            println!("{name}");
        }
        return Ok(());
    }

    if args.encode {
        let (arrow_param, config_param) = inline_params(&index)?;
        println!("arrow={arrow_param}");
        println!("config={config_param}");
        return Ok(());
    }

    if let Some(model) = &args.model
        && index.get(model).is_none()
    {
        let available: Vec<&str> = index.model_names().collect();
        return Err(anyhow!(
            "model `{model}` not found; available: {}",
            available.join(", ")
        ));
    }

    let mut viewer = Viewer::new(index, config.layout.layout_config());
    let preferred = args
        .model
        .as_deref()
        .or(config.layout.default_model.as_deref());
    viewer
        .select_default(preferred)
        .ok_or_else(|| anyhow!("no model to render"))?;

    let name = viewer.active_model().unwrap_or_default().to_string();
    {
        let layout = viewer
            .active_layout()
            .ok_or_else(|| anyhow!("no active layout"))?;
        println!(
            "model {name}: {} disks, extent {:.1}, center ({:.1}, {:.1}, {:.1}), camera radius {:.1}",
            layout.placements.len(),
            layout.total_extent,
            layout.center.x,
            layout.center.y,
            layout.center.z,
            layout.suggested_camera_radius(),
        );
        for (idx, placement) in layout.placements.iter().enumerate() {
            println!(
                "{idx:4}  {:<48} size {:8.1}  pos ({:8.1}, {:8.1}, {:8.1})  rgb ({:.2}, {:.2}, {:.2})",
                placement.name,
                placement.size,
                placement.position.x,
                placement.position.y,
                placement.position.z,
                placement.color[0],
                placement.color[1],
                placement.color[2],
            );
        }
    }

    println!();
    println!("{}", viewer.clear_selection());

    Ok(())
}

/// Re-encodes the loaded index into the two inline query parameters, the
/// same shape the notebook embed helper produces.
fn inline_params(index: &ModelIndex) -> Result<(String, String)> {
    let mut rows = Vec::new();
    let mut configs = Vec::new();

    for (model_name, entry) in index.iter() {
        if let Some(config) = &entry.config {
            configs.push(serde_json::to_value(config)?);
        }
        for tensor in &entry.tensors {
            let mut row = serde_json::Map::new();
            row.insert("id".to_string(), Value::from(tensor.id));
            row.insert("model_name".to_string(), Value::from(model_name));
            row.insert("param_name".to_string(), Value::from(tensor.name.clone()));
            row.insert("numel".to_string(), Value::from(tensor.numel));
            let shape = tensor
                .shape
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            row.insert("shape".to_string(), Value::from(shape));
            for (key, value) in &tensor.extra {
                row.insert(key.clone(), value.clone());
            }
            rows.push(Value::Object(row));
        }
    }

    let arrow_param = encode_payload(&Value::Array(rows))?;
    let config_param = encode_payload(&Value::Array(configs))?;
    Ok((arrow_param, config_param))
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inspect model tensor tables and print their disk layouts"
)]
struct Args {
    /// Additional configuration files applied in order (later files override earlier ones).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,
    /// Arrow IPC tensor table (path or URL); overrides the configured location.
    #[arg(long, value_name = "PATH")]
    table: Option<String>,
    /// JSONL model configuration file (path or URL); overrides the configured location.
    #[arg(long, value_name = "PATH")]
    configs: Option<String>,
    /// Inline compressed table payload (base64url zlib JSON), as found in the `arrow` query parameter.
    #[arg(long, value_name = "PAYLOAD")]
    arrow_param: Option<String>,
    /// Inline compressed config payload, as found in the `config` query parameter.
    #[arg(long, value_name = "PAYLOAD")]
    config_param: Option<String>,
    /// Model to lay out; defaults to the configured default model or the first one loaded.
    #[arg(long, value_name = "NAME")]
    model: Option<String>,
    /// List loaded model names and exit.
    #[arg(long)]
    list: bool,
    /// Re-encode the loaded data as inline query parameters and exit.
    #[arg(long)]
    encode: bool,
}
