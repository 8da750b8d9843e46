use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};

use rastermark::Config;
use rastermark::draw::Annotation;
use rastermark::editor::{Editor, ImageState, ToolSettings};
use rastermark::export::{ExportManager, ExportOutcome, FileSaveConfig};
use rastermark::raster::ImageLoader;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(name = "rastermark")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("RASTERMARK_GIT_HASH"), ")"),
    about = "Flatten annotations onto a raster image"
)]
struct Cli {
    /// Base image to annotate
    #[arg(long, short = 'i', value_name = "PATH", required_unless_present = "init_config")]
    image: Option<PathBuf>,

    /// JSON array of annotations to draw over the image
    #[arg(long, short = 'a', value_name = "JSON", required_unless_present = "init_config")]
    annotations: Option<PathBuf>,

    /// Write the result here instead of the configured export directory
    #[arg(long, short = 'o', value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Use this config file instead of ~/.config/rastermark/config.toml
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["image", "annotations"])]
    init_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let (Some(image), Some(annotations)) = (cli.image, cli.annotations) else {
        bail!("--image and --annotations are required");
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let annotations = read_annotations(&annotations)?;

    let mut save_config = FileSaveConfig::from(&config.export);
    if let Some(dir) = cli.output_dir {
        save_config.output_directory = Some(dir);
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let saved = runtime.block_on(flatten(&config, image, annotations, save_config))?;
    println!("{}", saved.display());
    Ok(())
}

fn read_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotations from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse annotations from {}", path.display()))
}

async fn flatten(
    config: &Config,
    image: PathBuf,
    annotations: Vec<Annotation>,
    save_config: FileSaveConfig,
) -> Result<PathBuf> {
    let handle = tokio::runtime::Handle::current();
    let loader = ImageLoader::new(&handle);
    let mut editor = Editor::new(ToolSettings::from_config(config));

    editor.begin_image_load(loader.load(&image));
    while !editor.poll_image() {
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    if let ImageState::Failed(message) = editor.image_state() {
        bail!("Failed to load {}: {message}", image.display());
    }

    for annotation in annotations {
        let id = annotation.id.clone();
        if !editor.add(annotation) {
            log::warn!("Skipped annotation with duplicate id {id}");
        }
    }

    let request = editor
        .export_request()
        .context("Base image is not available for export")?;
    let manager = ExportManager::new(&handle, save_config);
    manager.request_export(request)?;

    loop {
        match manager.take_result().await {
            Some(ExportOutcome::Success(result)) => {
                log::info!("Exported {} bytes", result.byte_len);
                return Ok(result.saved_path);
            }
            Some(ExportOutcome::Failed(message)) => bail!("Export failed: {message}"),
            None => tokio::time::sleep(POLL_INTERVAL).await,
        }
    }
}
