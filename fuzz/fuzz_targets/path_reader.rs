#![no_main]

use libfuzzer_sys::fuzz_target;
use pathorder::paths::{parse_paths, PathStatistics};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and ingestion must never panic, whatever the weights
        for weighted in [false, true] {
            if let Ok(sequences) = parse_paths(input, weighted) {
                let mut stats = PathStatistics::new(3);
                for sequence in &sequences {
                    let _ = stats.ingest(sequence);
                }
            }
        }
    }
});
