//! Fuzz target for the raw configuration payload parsers.
//!
//! Each parser must return a value or a field error code, never panic.

#![no_main]

use clr_config::parse::{
    parse_coefficients, parse_feature_types, parse_required_features, parse_state_mappings,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let required = serde_json::from_str(text)
        .map(|value| parse_required_features(&value))
        .unwrap_or_default();

    if let Ok(coefficients) = parse_coefficients(text) {
        assert!(coefficients.values().all(|w| w.is_finite()));
    }
    let _ = parse_feature_types(text, &required);
    if let Ok(mappings) = parse_state_mappings(text) {
        for table in mappings.values() {
            assert!(table.values().all(|v| v.is_finite()));
        }
    }
});
