//! Criterion benchmarks for the per-recompute scoring paths.

use clr_config::{LightGbmConfig, ModelConfig};
use clr_core::{CalibratedModel, LightGbmModel, RawSnapshot, RawValue};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const MODEL: &str = r#"{
    "schema_version": "1.0.0",
    "name": "Bench",
    "intercept": -2.0,
    "coefficients": {
        "sensor.temperature": 0.2,
        "sensor.humidity": 0.05,
        "binary_sensor.window": 1.1,
        "person.resident": -0.4
    },
    "required_features": ["sensor.temperature", "sensor.humidity", "binary_sensor.window", "person.resident"],
    "feature_types": {"binary_sensor.window": "categorical", "person.resident": "categorical"},
    "state_mappings": {
        "binary_sensor.window": {"on": 1, "off": 0},
        "person.resident": {"home": 1, "away": 0}
    },
    "calibration": {"slope": 0.8, "intercept": 0.1}
}"#;

const LIGHTGBM: &str = r#"{
    "schema_version": "1.0.0",
    "name": "Bench",
    "feature_names": ["event_count", "on_ratio"],
    "model_payload": {"intercept": -1.0, "weights": [0.4, 0.3]}
}"#;

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    let config = ModelConfig::from_str(MODEL).expect("bench model should parse");
    let model = CalibratedModel::from_config(&config).expect("bench model should validate");
    let snapshot = RawSnapshot::from([
        ("sensor.temperature".to_string(), RawValue::from("21.5")),
        ("sensor.humidity".to_string(), RawValue::Number(55.0)),
        ("binary_sensor.window".to_string(), RawValue::from("ON")),
        ("person.resident".to_string(), RawValue::from("away")),
    ]);
    group.bench_function("calibrated_evaluate", |b| {
        b.iter(|| black_box(model.evaluate(black_box(&snapshot))));
    });

    let config = LightGbmConfig::from_str(LIGHTGBM).expect("bench config should parse");
    let model = LightGbmModel::from_config(&config).expect("bench config should validate");
    let snapshot = RawSnapshot::from([
        ("event_count".to_string(), RawValue::Number(4.0)),
        ("on_ratio".to_string(), RawValue::from("0.5")),
    ]);
    group.bench_function("lightgbm_evaluate", |b| {
        b.iter(|| black_box(model.evaluate(black_box(&snapshot))));
    });

    group.finish();
}

criterion_group!(benches, bench_scoring);
criterion_main!(benches);
