use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::Builder;

use ingredient_lens::{InputLayout, LensConfig};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "LENS_CONFIG",
        "LENS_MODEL_PATH",
        "LENS_LABELS_PATH",
        "LENS_INPUT_LAYOUT",
        "LENS_INPUT_SIZE",
        "LENS_TOP_K",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp config");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_match_bundled_model() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = LensConfig::load().expect("load config");
    assert_eq!(cfg, LensConfig::default());
    assert_eq!(cfg.model_path, PathBuf::from("food101_model.onnx"));
    assert_eq!(cfg.labels_path, PathBuf::from("labels.txt"));
    assert_eq!(cfg.input_size, 224);
    assert_eq!(cfg.top_k, 3);
    assert_eq!(cfg.layout, InputLayout::Nhwc);

    let settings = cfg.settings();
    assert_eq!((settings.input_width, settings.input_height), (224, 224));
}

#[test]
fn loads_json_config_with_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        ".json",
        r#"{
            "model": {
                "path": "/opt/lens/food.onnx",
                "labels_path": "/opt/lens/food_labels.txt",
                "layout": "nchw"
            },
            "classifier": {
                "input_size": 192,
                "top_k": 5
            }
        }"#,
    );

    std::env::set_var("LENS_CONFIG", file.path());
    std::env::set_var("LENS_LABELS_PATH", "/data/labels.txt");
    std::env::set_var("LENS_TOP_K", "2");

    let cfg = LensConfig::load().expect("load config");
    assert_eq!(cfg.model_path, PathBuf::from("/opt/lens/food.onnx"));
    assert_eq!(cfg.labels_path, PathBuf::from("/data/labels.txt"));
    assert_eq!(cfg.layout, InputLayout::Nchw);
    assert_eq!(cfg.input_size, 192);
    assert_eq!(cfg.top_k, 2);

    clear_env();
}

#[test]
fn loads_toml_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        ".toml",
        r#"
            [model]
            path = "models/food101.onnx"

            [classifier]
            input_size = 256
        "#,
    );
    std::env::set_var("LENS_CONFIG", file.path());
    std::env::set_var("LENS_INPUT_LAYOUT", "NCHW");

    let cfg = LensConfig::load().expect("load config");
    assert_eq!(cfg.model_path, PathBuf::from("models/food101.onnx"));
    assert_eq!(cfg.labels_path, PathBuf::from("labels.txt"));
    assert_eq!(cfg.layout, InputLayout::Nchw);
    assert_eq!(cfg.input_size, 256);
    assert_eq!(cfg.top_k, 3);

    clear_env();
}

#[test]
fn rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("LENS_TOP_K", "0");
    assert!(LensConfig::load().is_err());
    clear_env();

    std::env::set_var("LENS_INPUT_SIZE", "huge");
    assert!(LensConfig::load().is_err());
    clear_env();

    std::env::set_var("LENS_INPUT_LAYOUT", "chw");
    assert!(LensConfig::load().is_err());
    clear_env();

    let file = write_config(".json", r#"{ "model": { "weights": "x" } }"#);
    std::env::set_var("LENS_CONFIG", file.path());
    let err = LensConfig::load().unwrap_err();
    assert!(err.to_string().contains("invalid config file"), "{}", err);

    clear_env();
}
