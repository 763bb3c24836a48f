#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use metricano_agent::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
flush:
  interval_ms: 1000
  skip_empty_batchs: false # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.flush.interval_ms, 60_000);
    assert!(cfg.flush.skip_empty_batches);
    assert_eq!(cfg.registry.reservoir_capacity, 1024);
    assert_eq!(cfg.log.percentile_fraction, 0.05);
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn rejects_out_of_range_values() {
    let cases = [
        "version: 1\nflush: { interval_ms: 10 }\n",
        "version: 1\nflush: { interval_ms: 1000, publish_timeout_ms: 2000 }\n",
        "version: 1\nflush: { interval_ms: 1000, publish_timeout_ms: 0 }\n",
        "version: 1\nregistry: { reservoir_capacity: 0 }\n",
        "version: 1\nlog: { percentile_fraction: 1.0 }\n",
    ];
    for yaml in cases {
        let err = config::load_from_str(yaml).expect_err(yaml);
        assert_eq!(err.code().as_str(), "INVALID_CONFIG", "yaml={yaml}");
    }
}
