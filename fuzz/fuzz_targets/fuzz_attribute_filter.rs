#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use maybe_loaded_core::predicate::{filter_all, first_matching};
use maybe_loaded_core::{FilterSpec, Row, Value};

#[derive(Arbitrary, Debug)]
struct Input {
    rows: Vec<Vec<(u8, i64)>>,
    conditions: Vec<(u8, Vec<i64>)>,
}

fn column(tag: u8) -> String {
    format!("c{}", tag % 4)
}

fuzz_target!(|input: Input| {
    let rows: Vec<Row> = input
        .rows
        .iter()
        .take(64)
        .map(|cells| Row::from_pairs(cells.iter().map(|(tag, v)| (column(*tag), *v))))
        .collect();

    let spec = FilterSpec::attributes(input.conditions.iter().take(8).map(|(tag, values)| {
        let expected = match values.as_slice() {
            [single] => Value::Integer(*single),
            many => Value::from(many.to_vec()),
        };
        (column(*tag), expected)
    }));

    let filtered = filter_all(&rows, &spec).expect("attribute maps always evaluate");
    let first = first_matching(&rows, &spec).expect("attribute maps always evaluate");

    // first_matching is the head of filter_all
    assert_eq!(filtered.first(), first.as_ref());
    // filtering is idempotent
    assert_eq!(filter_all(&filtered, &spec).unwrap(), filtered);
});
