//! Fuzz target for states payloads and snapshot inspection.

#![no_main]

use clr_core::config::parse_states;
use clr_core::encode::validate_categorical_mappings;
use clr_core::inspect_snapshot;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = parse_states(text) else {
        return;
    };

    let inspection = inspect_snapshot(&snapshot, true);
    assert!(inspection.missing_mappings.is_empty());
    assert!(
        validate_categorical_mappings(&inspection.feature_types, &inspection.state_mappings)
            .is_empty()
    );
});
