//! Shared fixtures and helper functions for config tests.

use crate::config::AppConfig;
use crate::error::{ConfigError, Result};
use ortho_config::MergeComposer;
use ortho_config::serde_json::{self, json};
use rstest::fixture;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        kubeconfig = "/home/user/.kube/config"
        namespace = "ci-scratch"
        image = "docker.io/library/alpine:latest"
        timeout_secs = 30
        cleanup = false

        [auth]
        api_server = "https://k8s.example.net:6443"
        token = "sekrit"
        insecure = true
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        image = "docker.io/library/perl:latest"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Create a composer seeded with the serialised application defaults.
///
/// This mirrors the production `load_config` behaviour, which serialises
/// `AppConfig::default()` as the defaults layer.
pub fn create_composer_with_defaults() -> Result<MergeComposer> {
    let mut composer = MergeComposer::new();
    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Create a composer with defaults, a file layer, and an environment layer
/// that partially overrides the file.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer> {
    let mut composer = create_composer_with_defaults()?;
    composer.push_file(
        json!({
            "namespace": "from-file",
            "image": "file-image:latest"
        }),
        None,
    );
    composer.push_environment(json!({
        "namespace": "from-env"
    }));
    Ok(composer)
}

/// Merge a composer into an `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig> {
    AppConfig::merge_from_layers(composer.layers()).map_err(|e| ConfigError::OrthoConfig(e).into())
}

/// Assert that a configuration carries the application defaults.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(config.kubeconfig.is_none());
    assert!(config.namespace.is_none());
    assert!(config.image.is_none());
    assert_eq!(config.timeout_secs, 120);
    assert!(config.cleanup);
    assert!(config.auth.api_server.is_none());
    assert!(!config.auth.insecure);
}
