mod backend;
pub mod backends;
mod classifier;
mod labels;
mod rank;
mod tensor;

pub use backend::InferenceBackend;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use classifier::{ClassifierSettings, IngredientClassifier};
pub use labels::LabelSet;
pub use rank::{top_k, RankedLabel, TOP_K};
pub use tensor::{InputLayout, InputTensor, CHANNELS, MODEL_INPUT_SIZE};
