#![no_main]

use demand_tracker::model::Records;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(records) = serde_json::from_slice::<Records>(data) else {
        return;
    };
    let encoded = serde_json::to_vec(&records).unwrap();
    let decoded: Records = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(records, decoded);
});
