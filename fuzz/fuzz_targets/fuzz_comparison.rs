#![no_main]

use libfuzzer_sys::fuzz_target;
use maybe_loaded_core::predicate::{filter_all, realizes_all};
use maybe_loaded_core::{Comparison, FilterSpec, Row};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(query) = std::str::from_utf8(data) {
        if query.len() > 10_000 {
            return;
        }

        // Parsing and evaluating must never panic
        let parsed = Comparison::parse(query);
        let rows = vec![
            Row::new().with("price", 10).with("id", 1),
            Row::new().with("price", -2.5).with("id", 2),
            Row::new().with("id", 3),
        ];
        let spec = FilterSpec::from(query);
        let filtered = filter_all(&rows, &spec);

        // Parser and evaluator agree on what is malformed
        assert_eq!(parsed.is_ok(), filtered.is_ok());
        assert_eq!(parsed.is_ok(), realizes_all(&rows[0], &spec).is_ok());
    }
});
