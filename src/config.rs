use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::classify::{ClassifierSettings, InputLayout, MODEL_INPUT_SIZE, TOP_K};

const DEFAULT_MODEL_PATH: &str = "food101_model.onnx";
const DEFAULT_LABELS_PATH: &str = "labels.txt";
const MAX_INPUT_SIZE: u32 = 4096;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LensConfigFile {
    model: Option<ModelConfigFile>,
    classifier: Option<ClassifierConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ModelConfigFile {
    path: Option<PathBuf>,
    labels_path: Option<PathBuf>,
    layout: Option<InputLayout>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ClassifierConfigFile {
    input_size: Option<u32>,
    top_k: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LensConfig {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub layout: InputLayout,
    pub input_size: u32,
    pub top_k: usize,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: PathBuf::from(DEFAULT_LABELS_PATH),
            layout: InputLayout::default(),
            input_size: MODEL_INPUT_SIZE,
            top_k: TOP_K,
        }
    }
}

impl LensConfig {
    /// Defaults, then the file named by `LENS_CONFIG` (if any), then `LENS_*` env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("LENS_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: LensConfigFile) -> Self {
        let defaults = Self::default();
        let model = file.model.unwrap_or_default();
        let classifier = file.classifier.unwrap_or_default();
        Self {
            model_path: model.path.unwrap_or(defaults.model_path),
            labels_path: model.labels_path.unwrap_or(defaults.labels_path),
            layout: model.layout.unwrap_or(defaults.layout),
            input_size: classifier.input_size.unwrap_or(defaults.input_size),
            top_k: classifier.top_k.unwrap_or(defaults.top_k),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("LENS_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.model_path = PathBuf::from(path);
            }
        }
        if let Ok(path) = std::env::var("LENS_LABELS_PATH") {
            if !path.trim().is_empty() {
                self.labels_path = PathBuf::from(path);
            }
        }
        if let Ok(layout) = std::env::var("LENS_INPUT_LAYOUT") {
            if !layout.trim().is_empty() {
                self.layout = layout.parse::<InputLayout>().context("LENS_INPUT_LAYOUT")?;
            }
        }
        if let Ok(size) = std::env::var("LENS_INPUT_SIZE") {
            self.input_size = size
                .trim()
                .parse()
                .map_err(|_| anyhow!("LENS_INPUT_SIZE must be a positive integer"))?;
        }
        if let Ok(top_k) = std::env::var("LENS_TOP_K") {
            self.top_k = top_k
                .trim()
                .parse()
                .map_err(|_| anyhow!("LENS_TOP_K must be a positive integer"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.input_size > MAX_INPUT_SIZE {
            return Err(anyhow!(
                "input_size must be between 1 and {}, got {}",
                MAX_INPUT_SIZE,
                self.input_size
            ));
        }
        if self.top_k == 0 {
            return Err(anyhow!("top_k must be greater than zero"));
        }
        Ok(())
    }

    pub fn settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            input_width: self.input_size,
            input_height: self.input_size,
            top_k: self.top_k,
        }
    }
}

fn read_config_file(path: &Path) -> Result<LensConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}
