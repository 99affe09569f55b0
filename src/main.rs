mod config;
mod error;
mod model;
mod preprocess;
mod report;

use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::model::{Engine, Prediction};
use crate::preprocess::ResizeFilter;

#[derive(Parser)]
#[command(
    name = "lung-predict",
    version,
    about = "Classify a lung histopathology image with a pre-trained model"
)]
struct Cli {
    /// ONNX model to load [default: lung_cancer_model.onnx]
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Image to classify [default: lung_image_sets/lung_aca/lungaca1.jpeg]
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Resampling filter used to resize the image to 224x224 [default: catmull-rom]
    #[arg(short, long, value_enum)]
    filter: Option<ResizeFilter>,

    /// Config file to use instead of the per-user one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = config::load_config(cli.config.as_deref())?;

    let model_path = cli.model.clone().unwrap_or_else(|| config.model_path());
    let image_path = cli.image.clone().unwrap_or_else(|| config.image_path());
    let filter = cli.filter.unwrap_or_else(|| config.resize_filter());

    let expected_sha256 = config.expected_sha256(cli.model.is_some(), model::embedded_sha256());

    let engine = Engine::new(&model_path, expected_sha256)?;
    let prediction = classify(&engine, &image_path, filter)?;

    if let Some(label) = config.label(prediction.argmax()) {
        info!("predicted label: {label}");
    }

    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), &prediction)?;
    Ok(())
}

/// Preprocess the image at `image_path` and run it through `engine`.
fn classify(engine: &Engine, image_path: &Path, filter: ResizeFilter) -> error::Result<Prediction> {
    debug!("resizing with {:?}", filter);
    let input = preprocess::load_image(image_path, filter)?;
    let prediction = engine.predict(&input)?;
    info!(
        "{} scored {} classes with {}",
        image_path.display(),
        prediction.num_classes(),
        engine.path().display()
    );
    Ok(prediction)
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .init();
}
