//! Ingredient Lens
//!
//! Turns a captured photo into a recipe search query:
//!
//! ```text
//! RawFrame --decode--> RasterImage --IngredientClassifier--> ["tomato", "basil", ...]
//!                                                        \--> search_query() -> "tomato basil ..."
//! ```
//!
//! # Module Structure
//!
//! - `frame`: frame containers (Plane, RawFrame, RasterImage)
//! - `decode`: 4:2:0 camera frame to RGB raster
//! - `classify`: model input tensor, inference backends, label set, top-K ranking, sessions
//! - `config`: file + env configuration for the bundled model and label list
//! - `error`: the pipeline's error taxonomy

pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod frame;

pub use classify::{
    top_k, ClassifierSettings, InferenceBackend, IngredientClassifier, InputLayout, InputTensor,
    LabelSet, RankedLabel, StubBackend, MODEL_INPUT_SIZE, TOP_K,
};
#[cfg(feature = "backend-tract")]
pub use classify::TractBackend;
pub use config::LensConfig;
pub use decode::decode;
pub use error::LensError;
pub use frame::{Plane, RasterImage, RawFrame};

/// Join ingredient names into the query string handed to recipe search.
///
/// Returns `None` for an empty list; the caller shows its "no ingredients detected" message.
pub fn search_query<S: AsRef<str>>(ingredients: &[S]) -> Option<String> {
    if ingredients.is_empty() {
        return None;
    }
    Some(
        ingredients
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_joins_with_single_spaces() {
        assert_eq!(
            search_query(&["banana", "carrot", "date"]).as_deref(),
            Some("banana carrot date")
        );
    }

    #[test]
    fn empty_result_has_no_query() {
        assert_eq!(search_query::<String>(&[]), None);
    }
}
