/// Failure kinds surfaced by the capture → classify pipeline.
///
/// Each variant maps to a distinct caller reaction:
/// - `Decode`: abandon this capture, let the user retake the photo.
/// - `ModelLoad`: the classifier was never built; the feature is unavailable for the session.
/// - `Inference`: a single classify call failed; the caller may offer a retry.
///
/// "No ingredients recognized" is NOT an error; it is an empty successful result.
#[derive(Debug)]
pub enum LensError {
    Decode {
        message: String,
    },
    ModelLoad {
        message: String,
        source: Option<anyhow::Error>,
    },
    Inference {
        message: String,
        source: Option<anyhow::Error>,
    },
}

impl LensError {
    pub fn decode(message: impl Into<String>) -> Self {
        LensError::Decode {
            message: message.into(),
        }
    }

    pub fn model_load(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        LensError::ModelLoad {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn inference(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        LensError::Inference {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Stable code for logs and user-facing message selection.
    pub fn code(&self) -> &'static str {
        match self {
            LensError::Decode { .. } => "DECODE_ERROR",
            LensError::ModelLoad { .. } => "MODEL_LOAD_ERROR",
            LensError::Inference { .. } => "INFERENCE_ERROR",
        }
    }
}

impl std::fmt::Display for LensError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensError::Decode { message } => write!(f, "{}: {}", self.code(), message),
            LensError::ModelLoad { message, source } | LensError::Inference { message, source } => {
                match source {
                    Some(source) => write!(f, "{}: {}: {:#}", self.code(), message, source),
                    None => write!(f, "{}: {}", self.code(), message),
                }
            }
        }
    }
}

impl std::error::Error for LensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LensError::Decode { .. } => None,
            LensError::ModelLoad { source, .. } | LensError::Inference { source, .. } => {
                source.as_ref().map(|e| {
                    let inner: &(dyn std::error::Error + 'static) = e.as_ref();
                    inner
                })
            }
        }
    }
}
