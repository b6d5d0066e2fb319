#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};
use tract_onnx::prelude::*;

use crate::classify::backend::InferenceBackend;
use crate::classify::tensor::{InputLayout, InputTensor, CHANNELS};

/// Tract-based backend for ONNX classification models.
///
/// Loads a local model file once and runs it on normalized RGB tensors.
/// No network I/O and no writes to disk.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>>,
    width: u32,
    height: u32,
    layout: InputLayout,
    output_len: Option<usize>,
    fingerprint: String,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for `width x height` input.
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        width: u32,
        height: u32,
        layout: InputLayout,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let bytes = std::fs::read(model_path)
            .with_context(|| format!("failed to read model file {}", model_path.display()))?;
        let fingerprint = hex::encode(Sha256::digest(&bytes));

        let (h, w) = (height as usize, width as usize);
        let input_shape = match layout {
            InputLayout::Nhwc => tvec!(1, h, w, CHANNELS),
            InputLayout::Nchw => tvec!(1, CHANNELS, h, w),
        };
        let model = tract_onnx::onnx()
            .model_for_read(&mut bytes.as_slice())
            .with_context(|| format!("failed to parse ONNX model {}", model_path.display()))?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        let output_len: Option<usize> = model
            .model()
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete().map(|dims| dims.iter().product()));

        log::info!(
            "loaded model {} sha256={} input={}x{} {:?} outputs={:?}",
            model_path.display(),
            fingerprint,
            width,
            height,
            layout,
            output_len
        );

        Ok(Self {
            model,
            width,
            height,
            layout,
            output_len,
            fingerprint,
        })
    }

    /// Hex SHA-256 of the model file.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn build_input(&self, input: &InputTensor) -> Result<Tensor> {
        if input.width() != self.width || input.height() != self.height {
            return Err(anyhow!(
                "input tensor {}x{} does not match model input {}x{}",
                input.width(),
                input.height(),
                self.width,
                self.height
            ));
        }

        let (h, w) = (self.height as usize, self.width as usize);
        let array = match self.layout {
            InputLayout::Nhwc => {
                tract_ndarray::Array4::from_shape_vec((1, h, w, CHANNELS), input.as_slice().to_vec())
            }
            InputLayout::Nchw => {
                tract_ndarray::Array4::from_shape_vec((1, CHANNELS, h, w), input.to_planar())
            }
        }
        .context("input tensor shape mismatch")?;

        Ok(array.into_tensor())
    }
}

impl InferenceBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }

    fn run(&mut self, input: &InputTensor) -> Result<Vec<f32>> {
        let tensor = self.build_input(input)?;
        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .context("ONNX inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let scores = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        Ok(scores.iter().copied().collect())
    }
}
