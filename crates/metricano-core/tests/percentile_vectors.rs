//! Percentile vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::time::Duration;

use metricano_core::{nearest_rank_from_top, DurationMetric};

mod vector_loader;
use vector_loader::PercentileVector;

fn load(name: &str) -> PercentileVector {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}

#[test]
fn percentile_vectors() {
    let files = [
        "p95_ten_samples.json",
        "p95_twenty_one_samples.json",
        "median_ten_samples.json",
        "empty_buffer.json",
        "skip_consumes_buffer.json",
    ];

    for f in files {
        let v = load(f);
        let got = nearest_rank_from_top(&v.samples(), v.fraction);
        assert_eq!(got, v.expected(), "vector={}", v.description);
    }
}

#[test]
fn metric_percentile_uses_retained_samples() {
    let v = load("p95_twenty_one_samples.json");
    let samples = v.samples();
    let sum = samples.iter().sum::<Duration>();
    let m = DurationMetric::new(
        "op",
        sum,
        Duration::from_millis(10),
        Duration::from_millis(210),
        samples.len() as u64,
        samples,
    );
    assert_eq!(m.p95(), Some(Duration::from_millis(200)));
}
