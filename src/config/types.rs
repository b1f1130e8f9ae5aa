//! Configuration data types for kubrun.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Cluster authentication configuration.
///
/// When `api_server` is set, kubrun connects to it directly using the bearer
/// token or basic credentials below instead of reading a kubeconfig file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Kubernetes API server URL.
    pub api_server: Option<String>,

    /// Bearer token presented to the API server.
    pub token: Option<String>,

    /// Username for basic authentication.
    pub username: Option<String>,

    /// Password for basic authentication.
    pub password: Option<String>,

    /// Accept invalid TLS certificates from the API server.
    pub insecure: bool,
}

impl AuthConfig {
    /// Returns whether a direct API server connection is configured.
    #[must_use]
    pub const fn has_api_server(&self) -> bool {
        self.api_server.is_some()
    }
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment
/// variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `KUBRUN_CONFIG_PATH` environment variable
/// 2. `.kubrun.toml` in the current working directory
/// 3. `.kubrun.toml` in the home directory
/// 4. `~/.config/kubrun/config.toml` (XDG default)
#[derive(Debug, Clone, SmartDefault, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "KUBRUN",
    post_merge_hook,
    discovery(
        app_name = "kubrun",
        env_var = "KUBRUN_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".kubrun.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Path to the kubeconfig file holding cluster credentials.
    pub kubeconfig: Option<Utf8PathBuf>,

    /// Namespace to run in; generated per session when absent.
    pub namespace: Option<String>,

    /// The container image to run.
    pub image: Option<String>,

    /// Seconds to wait for the job to complete. Zero waits indefinitely.
    #[default = 120]
    pub timeout_secs: u64,

    /// Delete created resources after the job finishes.
    #[default = true]
    pub cleanup: bool,

    /// Cluster authentication configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub auth: AuthConfig,
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Image presence is intentionally NOT validated here: the merged
        // configuration is also used for error reporting, and the missing
        // image must surface as the request-validation error, not as a
        // configuration-layer failure.
        Ok(())
    }
}
