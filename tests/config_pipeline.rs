//! End-to-end configuration loading: bytes → format dispatch → decode.

use std::time::Duration;

use appkit::config::decode::Value;
use appkit::config::loader::{load_bytes, ConfigError};
use appkit::config::{decode, load_config, unmarshal, DecodeError, ProbeConfig};
use appkit::structure;

mod common;

#[derive(Debug, Default, PartialEq)]
struct Retry {
    max_retries: u32,
    backoff: Duration,
}
structure!(Retry { max_retries, backoff });

#[derive(Debug, Default, PartialEq)]
struct Service {
    name: String,
    retry: Retry,
    verbose: bool,
    endpoints: Vec<String>,
}
structure!(Service { name, #[squash] retry, verbose, endpoints });

const JSON_DOC: &str = r#"{
    "Name": "edge",
    "Max-Retries": "5",
    "backoff": "2m30s",
    "VERBOSE": "True",
    "endpoints": "10.0.0.1:80"
}"#;

const YAML_DOC: &str = "
name: edge
max_retries: 5
Backoff: 2m30s
verbose: true
endpoints:
  - 10.0.0.1:80
";

fn expected() -> Service {
    Service {
        name: "edge".into(),
        retry: Retry {
            max_retries: 5,
            backoff: Duration::from_secs(150),
        },
        verbose: true,
        endpoints: vec!["10.0.0.1:80".into()],
    }
}

#[test]
fn test_json_and_yaml_decode_identically() {
    for format in ["", "json", "yaml"] {
        let mut from_json = Service::default();
        load_bytes(JSON_DOC.as_bytes(), format, &mut from_json).unwrap();
        assert_eq!(from_json, expected(), "json via {:?}", format);

        let mut from_yaml = Service::default();
        load_bytes(YAML_DOC.as_bytes(), format, &mut from_yaml).unwrap();
        assert_eq!(from_yaml, expected(), "yaml via {:?}", format);
    }
}

#[test]
fn test_unknown_format_errors() {
    let mut service = Service::default();
    let err = load_bytes(JSON_DOC.as_bytes(), "ini", &mut service).unwrap_err();
    assert!(matches!(err, ConfigError::Format(_)));
    assert!(err.to_string().contains("ini"));
    assert_eq!(service, Service::default());
}

#[test]
fn test_partial_failure_keeps_decoded_fields() {
    let tree: Value = unmarshal(b"name: edge\nmax_retries: many\nverbose: yes-please\n", "yaml").unwrap();
    let mut service = Service {
        retry: Retry {
            max_retries: 1,
            ..Default::default()
        },
        ..Default::default()
    };

    let err = decode(&tree, &mut service).unwrap_err();
    let errors = err.errors();
    let fields: Vec<_> = errors.iter().filter_map(|e| e.field()).collect();
    assert_eq!(fields, vec!["max_retries", "verbose"]);
    assert!(matches!(err, DecodeError::Multiple(_)));

    assert_eq!(service.name, "edge");
    assert_eq!(service.retry.max_retries, 1);
    assert!(!service.verbose);
}

#[test]
fn test_load_probe_config_from_file() {
    let path = common::write_temp_file(
        "probe.yaml",
        "interval: 250ms\nconnect-timeout: 1s\nmax-probes: 3\ntargets:\n  - name: a\n    addr: 127.0.0.1:1\n",
    );
    let config: ProbeConfig = load_config(&path, "yaml").unwrap();

    assert_eq!(config.timing.interval, Duration::from_millis(250));
    assert_eq!(config.timing.connect_timeout, Duration::from_secs(1));
    assert_eq!(config.max_probes, Some(3));
    assert_eq!(config.targets[0].address, "127.0.0.1:1");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_config::<ProbeConfig>(std::path::Path::new("/nonexistent/appkit.yaml"), "")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
