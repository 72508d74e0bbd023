//! Fuzz target for LightGBM-style configuration parsing and inference.

#![no_main]

use clr_config::LightGbmConfig;
use clr_core::{LightGbmModel, RawSnapshot, RawValue};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<LightGbmConfig>(data) else {
        return;
    };
    let config = config.normalized();
    if let Ok(model) = LightGbmModel::from_config(&config) {
        let snapshot: RawSnapshot = model
            .spec()
            .feature_names()
            .iter()
            .map(|name| (name.clone(), RawValue::Number(1.0)))
            .collect();
        let result = model.evaluate(&snapshot);
        if let Some(value) = result.native_value {
            assert!((0.0..=100.0).contains(&value));
        }
    }
});
