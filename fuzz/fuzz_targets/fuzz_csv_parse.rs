#![no_main]

use demand_tracker::format::csv;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(records) = csv::parse(text) else {
        return;
    };

    // Whatever parses must survive a write/parse cycle unchanged.
    let mut out = Vec::new();
    for record in &records {
        csv::write_record(&mut out, &record.fields).unwrap();
    }
    let reparsed = csv::parse(std::str::from_utf8(&out).unwrap()).unwrap();
    let before: Vec<&Vec<String>> = records.iter().filter(|r| !r.is_blank()).map(|r| &r.fields).collect();
    let after: Vec<&Vec<String>> = reparsed.iter().filter(|r| !r.is_blank()).map(|r| &r.fields).collect();
    assert_eq!(before, after);
});
