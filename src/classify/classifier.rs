use std::path::Path;
use std::time::Instant;

use crate::classify::backend::InferenceBackend;
use crate::classify::labels::LabelSet;
use crate::classify::rank::{top_k, RankedLabel, TOP_K};
use crate::classify::tensor::{InputTensor, MODEL_INPUT_SIZE};
use crate::decode::decode;
use crate::frame::{RasterImage, RawFrame};
use crate::LensError;

/// Fixed shape parameters of a classifier session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifierSettings {
    pub input_width: u32,
    pub input_height: u32,
    pub top_k: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            input_width: MODEL_INPUT_SIZE,
            input_height: MODEL_INPUT_SIZE,
            top_k: TOP_K,
        }
    }
}

/// One classification session: a backend plus the label set its outputs align with.
///
/// Both are fixed at construction. A session that fails to build does not exist, so
/// there is no half-loaded state to guard against afterwards.
pub struct IngredientClassifier<B: InferenceBackend> {
    backend: B,
    labels: LabelSet,
    settings: ClassifierSettings,
}

impl<B: InferenceBackend> IngredientClassifier<B> {
    pub fn new(backend: B, labels: LabelSet) -> Result<Self, LensError> {
        Self::with_settings(backend, labels, ClassifierSettings::default())
    }

    pub fn with_settings(
        mut backend: B,
        labels: LabelSet,
        settings: ClassifierSettings,
    ) -> Result<Self, LensError> {
        if settings.input_width == 0 || settings.input_height == 0 {
            return Err(LensError::ModelLoad {
                message: format!(
                    "model input size must be positive, got {}x{}",
                    settings.input_width, settings.input_height
                ),
                source: None,
            });
        }
        if settings.top_k == 0 {
            return Err(LensError::ModelLoad {
                message: "top_k must be greater than zero".to_string(),
                source: None,
            });
        }
        if let Some(outputs) = backend.output_len() {
            if outputs != labels.len() {
                return Err(LensError::ModelLoad {
                    message: format!(
                        "{} backend produces {} scores but label set has {} entries",
                        backend.name(),
                        outputs,
                        labels.len()
                    ),
                    source: None,
                });
            }
        }
        backend
            .warm_up()
            .map_err(|e| LensError::model_load("backend warm-up failed", e))?;

        log::info!(
            "classifier ready: backend={} labels={} input={}x{} top_k={}",
            backend.name(),
            labels.len(),
            settings.input_width,
            settings.input_height,
            settings.top_k
        );
        Ok(Self {
            backend,
            labels,
            settings,
        })
    }

    /// Build a session from bundled resources: a label file plus a backend loader.
    ///
    /// Any failure in either step is a `ModelLoad` error.
    pub fn from_assets<P, F>(
        labels_path: P,
        settings: ClassifierSettings,
        load_backend: F,
    ) -> Result<Self, LensError>
    where
        P: AsRef<Path>,
        F: FnOnce(&ClassifierSettings) -> anyhow::Result<B>,
    {
        let backend = load_backend(&settings)
            .map_err(|e| LensError::model_load("inference model unavailable", e))?;
        let labels = LabelSet::load(labels_path)?;
        Self::with_settings(backend, labels, settings)
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stretch-resize and normalize `image` into this session's input tensor.
    pub fn prepare(&self, image: &RasterImage) -> Result<InputTensor, LensError> {
        InputTensor::from_raster(image, self.settings.input_width, self.settings.input_height)
    }

    /// Top-K labels with their scores, best first.
    pub fn classify_ranked(&mut self, image: &RasterImage) -> Result<Vec<RankedLabel>, LensError> {
        let input = self.prepare(image)?;

        let name = self.backend.name();
        let started = Instant::now();
        let scores = self
            .backend
            .run(&input)
            .map_err(|e| LensError::inference(format!("{} backend run failed", name), e))?;
        log::debug!(
            "{} inference on {}x{} input took {:?}",
            name,
            input.width(),
            input.height(),
            started.elapsed()
        );

        top_k(&self.labels, &scores, self.settings.top_k)
    }

    /// Top-K ingredient names, best first. An empty result means nothing was recognized.
    pub fn classify(&mut self, image: &RasterImage) -> Result<Vec<String>, LensError> {
        Ok(self
            .classify_ranked(image)?
            .into_iter()
            .map(|ranked| ranked.label)
            .collect())
    }

    /// Decode a raw camera frame and classify it.
    pub fn classify_frame(&mut self, raw: &RawFrame) -> Result<Vec<String>, LensError> {
        let image = decode(raw)?;
        self.classify(&image)
    }
}
