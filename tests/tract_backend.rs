//! Model loading failures through the tract backend.
#![cfg(feature = "backend-tract")]

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use ingredient_lens::{ClassifierSettings, IngredientClassifier, InputLayout, LensError, TractBackend};

fn label_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp labels");
    file.write_all(b"apple_pie\nbaby_back_ribs\nbaklava\n")
        .expect("write labels");
    file
}

fn load_with_model(model: &Path) -> Result<IngredientClassifier<TractBackend>, LensError> {
    let labels = label_file();
    IngredientClassifier::from_assets(labels.path(), ClassifierSettings::default(), |settings| {
        TractBackend::load(
            model,
            settings.input_width,
            settings.input_height,
            InputLayout::Nhwc,
        )
    })
}

#[test]
fn missing_model_file_is_model_load_error() {
    let result = load_with_model(Path::new("/nonexistent/ingredient-lens/food101_model.onnx"));
    match result {
        Err(err @ LensError::ModelLoad { .. }) => {
            assert!(err.to_string().contains("failed to read model file"), "{}", err);
        }
        Err(other) => panic!("unexpected error kind: {}", other),
        Ok(_) => panic!("classifier built without a model file"),
    }
}

#[test]
fn junk_model_file_is_model_load_error() {
    let mut model = NamedTempFile::new().expect("temp model");
    model
        .write_all(b"\x00\x01 this is not an onnx protobuf \xff\xfe")
        .expect("write model");

    let result = load_with_model(model.path());
    assert!(matches!(result, Err(LensError::ModelLoad { .. })));
}
