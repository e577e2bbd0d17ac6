#![no_main]

use demand_tracker::filter::{SortKey, parse_choice};
use demand_tracker::model::{Priority, Status};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(priority) = text.parse::<Priority>() {
        assert_eq!(priority.as_str().parse::<Priority>().unwrap(), priority);
    }
    if let Ok(status) = text.parse::<Status>() {
        assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
    }
    let _ = parse_choice::<Status>(text);
    let _ = text.parse::<SortKey>();
});
