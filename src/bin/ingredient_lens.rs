//! ingredient_lens - classify a photo or raw camera frame into a recipe search query.
//!
//! Reads either an encoded photo (JPEG/PNG) or a packed 4:2:0 frame dump, runs the
//! configured food model once, and prints the top ingredient names and the joined query.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use ingredient_lens::{
    decode, search_query, IngredientClassifier, InferenceBackend, LensConfig, RankedLabel,
    RasterImage, RawFrame,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FrameFormat {
    Nv21,
    Nv12,
    I420,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Detect food ingredients in a photo and print a recipe search query"
)]
struct Args {
    /// Encoded photo to classify (JPEG or PNG).
    #[arg(long, value_name = "PATH", conflicts_with = "frame", required_unless_present = "frame")]
    image: Option<PathBuf>,

    /// Packed 4:2:0 frame dump to classify (requires --width and --height).
    #[arg(long, value_name = "PATH", requires_all = ["width", "height"])]
    frame: Option<PathBuf>,

    /// Plane layout of --frame.
    #[arg(long, value_enum, default_value = "nv21")]
    format: FrameFormat,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Model file (overrides LENS_MODEL_PATH / config).
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Newline-delimited label file (overrides LENS_LABELS_PATH / config).
    #[arg(long, value_name = "PATH")]
    labels: Option<PathBuf>,

    /// Print JSON with scores instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    ingredients: &'a [RankedLabel],
    query: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = LensConfig::load()?;
    if let Some(model) = &args.model {
        cfg.model_path = model.clone();
    }
    if let Some(labels) = &args.labels {
        cfg.labels_path = labels.clone();
    }

    let image = load_input(&args)?;
    log::info!("input image {}x{}", image.width(), image.height());

    let mut classifier = build_classifier(&cfg)?;
    let ranked = classifier.classify_ranked(&image)?;
    let names: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
    let query = search_query(&names);

    if args.json {
        let report = Report {
            ingredients: &ranked,
            query,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match query {
        Some(query) => {
            for entry in &ranked {
                println!("{:<24} {:.4}", entry.label, entry.score);
            }
            println!("query: {}", query);
        }
        None => println!("no ingredients detected"),
    }
    Ok(())
}

fn load_input(args: &Args) -> Result<RasterImage> {
    if let Some(path) = &args.image {
        return Ok(RasterImage::open(path)?);
    }
    let path = args
        .frame
        .as_ref()
        .ok_or_else(|| anyhow!("either --image or --frame is required"))?;
    let (width, height) = match (args.width, args.height) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(anyhow!("--frame requires --width and --height")),
    };
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read frame dump {}", path.display()))?;
    let raw = match args.format {
        FrameFormat::Nv21 => RawFrame::from_nv21(&bytes, width, height)?,
        FrameFormat::Nv12 => RawFrame::from_nv12(&bytes, width, height)?,
        FrameFormat::I420 => RawFrame::from_i420(&bytes, width, height)?,
    };
    Ok(decode(&raw)?)
}

#[cfg(feature = "backend-tract")]
fn build_classifier(cfg: &LensConfig) -> Result<IngredientClassifier<Box<dyn InferenceBackend>>> {
    use ingredient_lens::TractBackend;

    let classifier =
        IngredientClassifier::from_assets(&cfg.labels_path, cfg.settings(), |settings| {
            let backend = TractBackend::load(
                &cfg.model_path,
                settings.input_width,
                settings.input_height,
                cfg.layout,
            )?;
            Ok(Box::new(backend) as Box<dyn InferenceBackend>)
        })?;
    Ok(classifier)
}

#[cfg(not(feature = "backend-tract"))]
fn build_classifier(cfg: &LensConfig) -> Result<IngredientClassifier<Box<dyn InferenceBackend>>> {
    Err(anyhow!(
        "cannot load {}: model inference requires the backend-tract feature",
        cfg.model_path.display()
    ))
}
