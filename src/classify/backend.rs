use anyhow::Result;

use crate::classify::tensor::InputTensor;

/// Inference backend trait.
///
/// The model behind a backend is opaque: it accepts one normalized input tensor and
/// returns one score per label, index-aligned with the session's `LabelSet`.
///
/// `run` takes `&mut self`, so one backend instance serves one call at a time.
/// Callers wanting parallel classification build one backend per worker.
pub trait InferenceBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Number of scores the model produces, when the backend can tell before running.
    fn output_len(&self) -> Option<usize> {
        None
    }

    /// Run the model once.
    fn run(&mut self, input: &InputTensor) -> Result<Vec<f32>>;

    /// Optional warm-up hook, called once when a session is built.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<B: InferenceBackend + ?Sized> InferenceBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn output_len(&self) -> Option<usize> {
        (**self).output_len()
    }

    fn run(&mut self, input: &InputTensor) -> Result<Vec<f32>> {
        (**self).run(input)
    }

    fn warm_up(&mut self) -> Result<()> {
        (**self).warm_up()
    }
}
