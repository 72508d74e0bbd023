//! No-mock configuration loading + validation + resolution tests.
//!
//! Covers:
//! - Model configs written to real files (JSON and TOML) and validated
//! - Raw payload parsing feeding a config that then validates
//! - Resolution order (CLI > CLR_MODEL > CLR_CONFIG_DIR)

use clr_config::parse::{parse_coefficients, parse_feature_types, parse_required_features, parse_state_mappings};
use clr_config::resolve::resolve_model_path;
use clr_config::validate::{validate_lightgbm_config, validate_model_config};
use clr_config::{
    CalibrationParams, ConfigSource, FieldErrorCode, LightGbmConfig, ModelConfig, ValidationError,
    CONFIG_SCHEMA_VERSION,
};
use serde_json::json;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const KITCHEN_JSON: &str = r#"{
    "schema_version": "1.0.0",
    "name": "Kitchen CLR",
    "goal": "risk",
    "intercept": -0.2,
    "coefficients": {"sensor.a": 0.5, "binary_sensor.window": 0.8},
    "required_features": ["sensor.a", "binary_sensor.window"],
    "feature_types": {"sensor.a": "numeric", "binary_sensor.window": "categorical"},
    "state_mappings": {"binary_sensor.window": {"on": 1.0, "off": 0.0}},
    "calibration": {"slope": 1.0, "intercept": 0.0}
}"#;

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn json_file_loads_and_validates() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(dir.path(), "kitchen.json", KITCHEN_JSON);

    let config = ModelConfig::from_file(&path).expect("load model config");
    validate_model_config(&config).expect("valid config");

    assert_eq!(config.name, "Kitchen CLR");
    assert_eq!(config.goal.as_deref(), Some("risk"));
    assert_eq!(config.calibration, CalibrationParams::identity());
}

#[test]
fn toml_file_loads_and_validates() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        dir.path(),
        "kitchen.toml",
        r#"
schema_version = "1.0.0"
name = "Kitchen CLR"
intercept = -0.2
required_features = ["sensor.a"]

[coefficients]
"sensor.a" = 0.5
"#,
    );

    let config = ModelConfig::from_file(&path).expect("load toml config");
    validate_model_config(&config).expect("valid config");
    assert_eq!(config.coefficients["sensor.a"], 0.5);
}

#[test]
fn toml_infinity_is_caught_by_validation() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        dir.path(),
        "broken.toml",
        r#"
schema_version = "1.0.0"
name = "Broken"
intercept = inf
required_features = ["sensor.a"]

[coefficients]
"sensor.a" = 0.5
"#,
    );

    let config = ModelConfig::from_file(&path).expect("toml accepts inf");
    let err = validate_model_config(&config).unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|e| e.get("intercept")),
        Some(FieldErrorCode::InvalidNumber)
    );
}

#[test]
fn missing_file_is_io_error() {
    let err = ModelConfig::from_file(Path::new("/nonexistent/clr/model.json")).unwrap_err();
    assert!(matches!(err, ValidationError::IoError(_)));
    assert_eq!(err.code(), 60);
}

#[test]
fn raw_payloads_build_a_valid_config() {
    let required = parse_required_features(&json!("sensor.a, binary_sensor.window"));
    let coefficients =
        parse_coefficients(r#"{"sensor.a": 0.5, "binary_sensor.window": "0.8"}"#).unwrap();
    let feature_types = parse_feature_types(
        r#"{"sensor.a": "numeric", "binary_sensor.window": "categorical"}"#,
        &required,
    )
    .unwrap();
    let state_mappings = parse_state_mappings(r#"{"binary_sensor.window": {"On": 1, "Off": 0}}"#).unwrap();

    let config = ModelConfig {
        schema_version: CONFIG_SCHEMA_VERSION.to_string(),
        name: "Kitchen CLR".to_string(),
        goal: None,
        intercept: -0.2,
        coefficients,
        required_features: required,
        feature_types,
        state_mappings,
        calibration: CalibrationParams::new(0.5, -0.2),
        threshold: 60.0,
    };
    validate_model_config(&config).expect("valid config");
}

#[test]
fn unknown_categorical_without_table_fails_with_code() {
    let required = parse_required_features(&json!(["sensor.status_text"]));
    let config = ModelConfig {
        schema_version: CONFIG_SCHEMA_VERSION.to_string(),
        name: "Status".to_string(),
        goal: None,
        intercept: 0.0,
        coefficients: parse_coefficients(r#"{"sensor.status_text": 1.0}"#).unwrap(),
        feature_types: parse_feature_types(r#"{"sensor.status_text": "categorical"}"#, &required)
            .unwrap(),
        required_features: required,
        state_mappings: parse_state_mappings("{}").unwrap(),
        calibration: CalibrationParams::identity(),
        threshold: 50.0,
    };

    let err = validate_model_config(&config).unwrap_err();
    assert_eq!(
        err.field_errors().and_then(|e| e.get("state_mappings")),
        Some(FieldErrorCode::MissingCategoricalMappings)
    );

    let mut fixed = config.clone();
    fixed.state_mappings =
        parse_state_mappings(r#"{"sensor.status_text": {"mystery": 0.5}}"#).unwrap();
    validate_model_config(&fixed).expect("mapping supplied");
}

#[test]
fn lightgbm_file_loads_and_validates() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        dir.path(),
        "bedroom.json",
        r#"{
            "schema_version": "1.0.0",
            "name": "Bedroom",
            "feature_names": ["event_count", "on_ratio"],
            "model_payload": {"intercept": -1.0, "weights": [0.4, 0.3]},
            "threshold": 75.0
        }"#,
    );
    let config = LightGbmConfig::from_file(&path).expect("load lightgbm config");
    validate_lightgbm_config(&config).expect("valid lightgbm config");
}

#[test]
fn resolution_prefers_cli_then_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&["CLR_MODEL", "CLR_CONFIG_DIR"]);
        let dir = TempDir::new().expect("tempdir");
        let env_model = write(dir.path(), "env_model.json", KITCHEN_JSON);
        let cli_model = write(dir.path(), "cli_model.json", KITCHEN_JSON);

        env::set_var("CLR_MODEL", &env_model);
        env::remove_var("CLR_CONFIG_DIR");

        let resolved = resolve_model_path(Some(&cli_model));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path.as_deref(), Some(cli_model.as_path()));

        let resolved = resolve_model_path(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.as_deref(), Some(env_model.as_path()));
    });
}

#[test]
fn resolution_uses_config_dir_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&["CLR_MODEL", "CLR_CONFIG_DIR"]);
        let dir = TempDir::new().expect("tempdir");
        let model = write(dir.path(), "model.json", KITCHEN_JSON);

        env::remove_var("CLR_MODEL");
        env::set_var("CLR_CONFIG_DIR", dir.path());

        let resolved = resolve_model_path(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.as_deref(), Some(model.as_path()));
    });
}

#[test]
fn env_model_pointing_nowhere_is_skipped() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&["CLR_MODEL", "CLR_CONFIG_DIR"]);
        let dir = TempDir::new().expect("tempdir");
        let model = write(dir.path(), "model.json", KITCHEN_JSON);

        env::set_var("CLR_MODEL", dir.path().join("missing.json"));
        env::set_var("CLR_CONFIG_DIR", dir.path());

        let resolved = resolve_model_path(None);
        assert_eq!(resolved.path.as_deref(), Some(model.as_path()));
    });
}
