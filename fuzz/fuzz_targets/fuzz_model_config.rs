//! Fuzz target for model configuration parsing, validation and scoring.
//!
//! Parsing and validation may reject input but must never panic. A model
//! that validates always requires at least one feature, so an empty
//! snapshot can never produce a reading.

#![no_main]

use clr_config::validate::validate_model_config;
use clr_config::ModelConfig;
use clr_core::{CalibratedModel, FeatureValues, RawSnapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for parsed in [ModelConfig::from_str(text), ModelConfig::from_toml_str(text)] {
        let Ok(config) = parsed else {
            continue;
        };
        let _ = validate_model_config(&config);
        if let Ok(model) = CalibratedModel::from_config(&config) {
            assert!(!model.evaluate(&RawSnapshot::new()).available);

            let zeros: FeatureValues = model
                .required_features()
                .iter()
                .map(|name| (name.clone(), 0.0))
                .collect();
            let score = model.score(&zeros);
            assert!((0.0..=1.0).contains(&score.probability));
        }
    }
});
