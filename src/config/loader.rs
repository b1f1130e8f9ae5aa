//! Configuration loading with layered precedence.
//!
//! This module provides functions to load configuration with the precedence
//! order (lowest to highest): application defaults, configuration file,
//! environment variables, command-line arguments.
//!
//! # Architecture Note: Why Manual Layer Composition?
//!
//! The `OrthoConfig` derive macro provides `load()` and `compose_layers()`
//! methods that handle discovery, environment variables, and CLI parsing
//! automatically. However, this loader uses `MergeComposer` manually because:
//!
//! 1. **Trailing-command separation**: the CLI (`Cli` struct) owns the
//!    trailing `-- COMMAND...` positional arguments, which are not
//!    configuration values at all. `OrthoConfig`'s `load()` expects to own the
//!    entire CLI parsing.
//!
//! 2. **Environment variable validation**: `OrthoConfig`'s environment layer
//!    uses Figment, which silently ignores unparseable values. This loader
//!    implements fail-fast validation that returns errors for invalid typed
//!    values.
//!
//! 3. **Custom discovery integration**: the `Cli` struct already accepts
//!    `--config` via clap, so discovery must honour that path before falling
//!    back to XDG paths.
//!
//! The trade-off is more code in this module, but better error messages and
//! integration with the existing CLI structure.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (e.g., `KUBRUN_CLEANUP=maybe`
//! instead of `true`/`false`) return an error immediately. This fail-fast
//! approach ensures misconfigurations are visible to users rather than
//! silently falling back to defaults.
//!
//! String fields (e.g., `KUBRUN_IMAGE`) are always accepted. Typed fields like
//! booleans (`KUBRUN_CLEANUP`, `KUBRUN_AUTH_INSECURE`) or integers
//! (`KUBRUN_TIMEOUT_SECS`) must have valid values or configuration loading
//! will fail with a clear error.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

// ============================================================================
// Environment Variable Specification Table
// ============================================================================

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `KUBRUN_IMAGE`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["auth", "insecure"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
///
/// Adding or modifying environment variable mappings is a single-line change
/// here. The order doesn't matter as the table is processed in a single pass.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    // Top-level fields
    EnvVarSpec {
        env_var: "KUBRUN_KUBECONFIG",
        path: &["kubeconfig"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "KUBRUN_NAMESPACE",
        path: &["namespace"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "KUBRUN_IMAGE",
        path: &["image"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "KUBRUN_TIMEOUT_SECS",
        path: &["timeout_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "KUBRUN_CLEANUP",
        path: &["cleanup"],
        var_type: EnvVarType::Bool,
    },
    // Auth fields
    EnvVarSpec {
        env_var: "KUBRUN_AUTH_API_SERVER",
        path: &["auth", "api_server"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "KUBRUN_AUTH_TOKEN",
        path: &["auth", "token"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "KUBRUN_AUTH_USERNAME",
        path: &["auth", "username"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "KUBRUN_AUTH_PASSWORD",
        path: &["auth", "password"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "KUBRUN_AUTH_INSECURE",
        path: &["auth", "insecure"],
        var_type: EnvVarType::Bool,
    },
];

/// Returns the list of environment variable names recognised by the config
/// loader.
///
/// This is primarily useful for tests that need to clear all `KUBRUN_*`
/// environment variables to ensure isolation. Using this function instead of
/// a hard-coded list ensures the test stays in sync with the loader's actual
/// environment variable mappings.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// Uses `cap_std::fs_utf8` for capability-oriented filesystem access as per
/// project conventions. The function opens the parent directory of the config
/// file and reads from there.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    // Open the parent directory using ambient authority, then read the file.
    let current_dir = Utf8PathBuf::from(".");
    let parent = path.parent().unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration with full layer precedence.
///
/// This function loads configuration from all available sources:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (discovered via XDG paths or `KUBRUN_CONFIG_PATH`)
/// 3. Environment variables prefixed with `KUBRUN_`
/// 4. Command-line arguments (from the provided `Cli`)
///
/// Later sources override earlier ones.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - Malformed configuration files
/// - Invalid typed environment variable values (e.g., non-boolean for
///   `KUBRUN_CLEANUP`)
/// - Missing required fields after merge
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults (serialised from AppConfig::default()).
    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Configuration file.
    // Use the CLI-provided path (if it exists), or discover via XDG paths.
    let config_path: Option<Utf8PathBuf> =
        cli.config.clone().filter(|p| p.exists()).or_else(|| {
            // Discover config files using ortho_config's ConfigDiscovery builder.
            let discovery = ConfigDiscovery::builder("kubrun")
                .env_var("KUBRUN_CONFIG_PATH")
                .config_file_name("config.toml")
                .dotfile_name(".kubrun.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|p| p.exists())
                .find_map(|p| Utf8PathBuf::try_from(p).ok())
        });

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    // Layer 3: Environment variables.
    let env_values = collect_env_vars()?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    // Layer 4: CLI overrides.
    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    // Merge all layers into the final configuration.
    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Collect environment variables with the `KUBRUN_` prefix into a JSON value.
///
/// This function uses a data-driven approach: all environment variable
/// mappings are defined in [`ENV_VAR_SPECS`]. Adding or changing mappings
/// requires only a single-line change in that table.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed environment variable (bool,
/// u64) has an unparseable value. This fail-fast approach ensures
/// misconfigurations are visible to users.
fn collect_env_vars() -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Ok(raw_value) = std::env::var(spec.env_var) else {
            continue;
        };

        // Parse the value according to its expected type.
        // Invalid values return an error immediately (fail-fast).
        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::U64 => match raw_value.parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        // Insert at the appropriate path (supports arbitrary nesting depth).
        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map.
///
/// For a path like `["auth", "insecure"]`, this creates the intermediate
/// `auth` object if needed and inserts `insecure` within it.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    // Navigate to the parent object, creating intermediate objects as needed.
    let mut current = root;
    for &segment in parents {
        // Ensure the entry is an object; if it's not (shouldn't happen with
        // our controlled path specs), skip this insertion.
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    // Insert the final field.
    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
///
/// The `--timeout`, `--api-server`, and `--insecure` flags map onto the
/// `timeout_secs`, `auth.api_server`, and `auth.insecure` configuration
/// fields respectively; the rest share their configuration field's name.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref kubeconfig) = cli.kubeconfig {
        insert_at_path(
            &mut overrides,
            &["kubeconfig"],
            Value::String(kubeconfig.to_string()),
        );
    }

    if let Some(ref namespace) = cli.namespace {
        insert_at_path(
            &mut overrides,
            &["namespace"],
            Value::String(namespace.clone()),
        );
    }

    if let Some(ref image) = cli.image {
        insert_at_path(&mut overrides, &["image"], Value::String(image.clone()));
    }

    if let Some(timeout) = cli.timeout {
        insert_at_path(&mut overrides, &["timeout_secs"], Value::Number(timeout.into()));
    }

    if let Some(cleanup) = cli.cleanup {
        insert_at_path(&mut overrides, &["cleanup"], Value::Bool(cleanup));
    }

    if let Some(ref api_server) = cli.api_server {
        insert_at_path(
            &mut overrides,
            &["auth", "api_server"],
            Value::String(api_server.clone()),
        );
    }

    if let Some(insecure) = cli.insecure {
        insert_at_path(&mut overrides, &["auth", "insecure"], Value::Bool(insecure));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
