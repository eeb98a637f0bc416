use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use photo_stylizer::{
    config::Config,
    handler::{RequestHandler, Upload},
    styles::StyleRegistry,
    transform::TransformEngine,
};

#[derive(Parser)]
#[command(
    name = "photo-stylizer",
    version,
    about = "Turn photos into pencil sketches, oil paintings, modern art and anime drawings",
    long_about = "Photo-Stylizer applies a fixed artistic filter pipeline to each input image and writes the result as PNG."
)]
struct Cli {
    /// Image file to transform (PNG, JPEG, GIF, BMP, WebP); repeat for several
    #[arg(short, long = "input", value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Directory the PNG results are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Style to apply (pencil_sketch, oil_painting, modern_art, anime)
    #[arg(short, long)]
    style: Option<String>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List the available styles and their parameters, then exit
    #[arg(long)]
    list_styles: bool,

    /// Write the default configuration to this path, then exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.to_string())),
        )
        .init();

    if let Some(path) = &cli.write_config {
        Config::default()
            .save_to_file(path)
            .with_context(|| format!("writing configuration to {:?}", path))?;
        info!("Default configuration written to {:?}", path);
        return Ok(());
    }

    if cli.list_styles {
        print_styles();
        return Ok(());
    }

    if cli.inputs.is_empty() {
        anyhow::bail!("no input images given; pass one or more --input FILE");
    }

    info!("Starting Photo-Stylizer v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    let engine = TransformEngine::new(config)?;
    let handler = Arc::new(RequestHandler::new(engine));

    tokio::fs::create_dir_all(&cli.output_dir)
        .await
        .with_context(|| format!("creating output directory {:?}", cli.output_dir))?;

    let tasks: Vec<_> = cli
        .inputs
        .iter()
        .cloned()
        .map(|input| {
            let handler = Arc::clone(&handler);
            let output_dir = cli.output_dir.clone();
            let style = cli.style.clone();
            tokio::spawn(async move {
                let result = process(&handler, &input, &output_dir, style).await;
                (input, result)
            })
        })
        .collect();

    let mut failures = 0usize;
    for task in tasks {
        let (input, result) = task.await.context("transform task panicked")?;
        match result {
            Ok(output) => info!("{:?} -> {:?}", input, output),
            Err(e) => {
                failures += 1;
                error!("{:?}: {:#}", input, e);
            }
        }
    }

    handler.sweep();

    if failures > 0 {
        anyhow::bail!("{} of {} images failed", failures, cli.inputs.len());
    }

    info!("All {} images transformed", cli.inputs.len());
    Ok(())
}

async fn process(
    handler: &RequestHandler,
    input: &Path,
    output_dir: &Path,
    style: Option<String>,
) -> Result<PathBuf> {
    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("reading {:?}", input))?;

    let filename = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut upload = Upload::new(filename, bytes);
    upload.style = style;

    let id = handler
        .handle(upload)
        .await
        .map_err(|e| {
            let message = e.user_message();
            anyhow::Error::new(e).context(message)
        })?;

    let stored = handler
        .store()
        .remove(&id)
        .with_context(|| format!("result {} expired before it was written", id))?;

    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.clone());
    let output = output_dir.join(format!("result_{}.png", stem));

    tokio::fs::write(&output, stored.image.as_bytes())
        .await
        .with_context(|| format!("writing {:?}", output))?;
    Ok(output)
}

fn print_styles() {
    let registry = StyleRegistry::new();

    for name in registry.available_styles() {
        let Some(style) = registry.get_style(&name) else { continue };
        let marker = if name == registry.default_style() { " (default)" } else { "" };

        let metadata = style.metadata();
        println!(
            "{}{}: {} [cost {:.1}]",
            name,
            marker,
            style.description(),
            metadata.performance_impact
        );
        for (key, description) in metadata.optional_parameters {
            println!("    {:<18} {}", key, description);
        }
    }
}
