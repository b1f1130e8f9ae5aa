//! Basic type and serialisation tests for kubrun configuration types.

use crate::config::AppConfig;
use crate::config::tests::helpers::{app_config_from_full_toml, app_config_from_partial_toml};
use rstest::rstest;

#[rstest]
fn app_config_defaults_match_documented_values() {
    let config = AppConfig::default();
    assert!(config.kubeconfig.is_none());
    assert!(config.namespace.is_none());
    assert!(config.image.is_none());
    assert_eq!(config.timeout_secs, 120);
    assert!(config.cleanup);
}

#[rstest]
fn auth_config_defaults_to_no_api_server() {
    let config = AppConfig::default();
    assert!(!config.auth.has_api_server());
    assert!(config.auth.token.is_none());
    assert!(config.auth.username.is_none());
    assert!(config.auth.password.is_none());
    assert!(!config.auth.insecure);
}

#[rstest]
fn full_toml_parses_every_field(app_config_from_full_toml: AppConfig) {
    let config = app_config_from_full_toml;
    assert_eq!(
        config.kubeconfig.as_deref().map(camino::Utf8Path::as_str),
        Some("/home/user/.kube/config")
    );
    assert_eq!(config.namespace.as_deref(), Some("ci-scratch"));
    assert_eq!(
        config.image.as_deref(),
        Some("docker.io/library/alpine:latest")
    );
    assert_eq!(config.timeout_secs, 30);
    assert!(!config.cleanup);
    assert_eq!(
        config.auth.api_server.as_deref(),
        Some("https://k8s.example.net:6443")
    );
    assert_eq!(config.auth.token.as_deref(), Some("sekrit"));
    assert!(config.auth.insecure);
}

#[rstest]
fn partial_toml_fills_remaining_fields_with_defaults(app_config_from_partial_toml: AppConfig) {
    let config = app_config_from_partial_toml;
    assert_eq!(
        config.image.as_deref(),
        Some("docker.io/library/perl:latest")
    );
    assert_eq!(config.timeout_secs, 120);
    assert!(config.cleanup);
    assert!(config.namespace.is_none());
    assert!(!config.auth.insecure);
}

#[rstest]
fn app_config_round_trips_through_json() {
    let config = AppConfig {
        image: Some(String::from("alpine:3.20")),
        timeout_secs: 7,
        ..AppConfig::default()
    };
    let serialised = serde_json::to_string(&config).expect("serialisation should succeed");
    let parsed: AppConfig =
        serde_json::from_str(&serialised).expect("deserialisation should succeed");
    assert_eq!(parsed.image.as_deref(), Some("alpine:3.20"));
    assert_eq!(parsed.timeout_secs, 7);
    assert!(parsed.cleanup);
}
