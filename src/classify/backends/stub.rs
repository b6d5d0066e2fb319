use anyhow::{anyhow, Result};

use crate::classify::backend::InferenceBackend;
use crate::classify::tensor::InputTensor;

/// Scripted backend for tests and demos.
///
/// Returns the same probability vector on every call, or fails every call when built
/// with `failing`. Records how many times it ran and the size of the last input.
pub struct StubBackend {
    scores: Result<Vec<f32>, String>,
    calls: usize,
    last_input_len: Option<usize>,
}

impl StubBackend {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores: Ok(scores),
            calls: 0,
            last_input_len: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            scores: Err(message.into()),
            calls: 0,
            last_input_len: None,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn last_input_len(&self) -> Option<usize> {
        self.last_input_len
    }
}

impl InferenceBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn run(&mut self, input: &InputTensor) -> Result<Vec<f32>> {
        self.calls += 1;
        self.last_input_len = Some(input.len());
        match &self.scores {
            Ok(scores) => Ok(scores.clone()),
            Err(message) => Err(anyhow!("{}", message)),
        }
    }
}
