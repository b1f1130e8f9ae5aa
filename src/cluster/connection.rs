//! Credential-file resolution and Kubernetes client construction.
//!
//! This module provides functionality to resolve cluster credentials from
//! multiple sources (explicit configuration, environment variables, the
//! home-directory default) and establish an authenticated connection using
//! the `kube` library.

use camino::{Utf8Path, Utf8PathBuf};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::{ConfigError, KubrunError};

/// Environment variable naming an explicit kubeconfig file.
const KUBECONFIG_ENV_VAR: &str = "KUBECONFIG";

/// Environment variable used to locate the home-directory default.
const HOME_ENV_VAR: &str = "HOME";

/// Kubeconfig location relative to the home directory.
const DEFAULT_KUBECONFIG_SUFFIX: &str = ".kube/config";

/// Resolves kubeconfig paths from environment variables.
///
/// The resolver checks `KUBECONFIG` and the home-directory default when no
/// explicit path is provided.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing for testable environment variable access.
///
/// # Example
///
/// ```ignore
/// use mockable::DefaultEnv;
/// use kubrun::cluster::CredentialResolver;
///
/// let env = DefaultEnv::new();
/// let resolver = CredentialResolver::new(&env);
///
/// if let Some(path) = resolver.resolve(None) {
///     println!("Using credentials from {path}");
/// }
/// ```
pub struct CredentialResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> CredentialResolver<'a, E> {
    /// Creates a new credential resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves the kubeconfig path from the `KUBECONFIG` environment
    /// variable.
    ///
    /// Returns `None` if the variable is unset or empty.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<Utf8PathBuf> {
        self.env
            .string(KUBECONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(Utf8PathBuf::from)
    }

    /// Returns the home-directory default kubeconfig path, when the file
    /// exists.
    ///
    /// This is `$HOME/.kube/config`; a path is only returned for a file that
    /// is actually present, so an absent default falls through to inferred
    /// in-cluster configuration.
    #[must_use]
    pub fn default_path(&self) -> Option<Utf8PathBuf> {
        self.env
            .string(HOME_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(|home| Utf8PathBuf::from(home).join(DEFAULT_KUBECONFIG_SUFFIX))
            .filter(|path| path.exists())
    }

    /// Resolves the kubeconfig path without reading it.
    ///
    /// Resolution order:
    /// 1. `config_path` (from CLI, config file, or `KUBRUN_KUBECONFIG`)
    /// 2. `KUBECONFIG` environment variable
    /// 3. `$HOME/.kube/config` (when the file exists)
    #[must_use]
    pub fn resolve(&self, config_path: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        config_path
            .filter(|path| !path.as_str().is_empty())
            .map(Utf8Path::to_path_buf)
            .or_else(|| self.resolve_from_env())
            .or_else(|| self.default_path())
    }
}

/// Builds authenticated Kubernetes clients from resolved credentials.
///
/// The connector supports direct API server connections (bearer token or
/// basic authentication), explicit kubeconfig files, and inferred in-cluster
/// configuration.
pub struct ClusterConnector;

impl ClusterConnector {
    /// Connect to the cluster using the resolved credential source.
    ///
    /// A configured API server URL takes precedence over kubeconfig
    /// resolution; when neither yields credentials the configuration is
    /// inferred (covering in-cluster service accounts).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CredentialsNotFound` if no credential source
    /// resolves, `ConfigError::InvalidValue` for an unparseable API server
    /// URL, and `ConfigError::ClientBuildFailed` if a resolved source cannot
    /// produce a working client.
    pub async fn connect<E: mockable::Env>(
        auth: &AuthConfig,
        kubeconfig: Option<&Utf8Path>,
        resolver: &CredentialResolver<'_, E>,
    ) -> Result<Client, KubrunError> {
        let config = Self::build_config(auth, kubeconfig, resolver).await?;

        Client::try_from(config).map_err(|e| {
            KubrunError::from(ConfigError::ClientBuildFailed {
                source_name: String::from("resolved cluster configuration"),
                message: e.to_string(),
            })
        })
    }

    /// Build a `kube::Config` from the highest-priority credential source.
    async fn build_config<E: mockable::Env>(
        auth: &AuthConfig,
        kubeconfig: Option<&Utf8Path>,
        resolver: &CredentialResolver<'_, E>,
    ) -> Result<Config, KubrunError> {
        if let Some(ref api_server) = auth.api_server {
            info!(api_server, "connecting directly to API server");
            return Self::config_from_api_server(api_server, auth);
        }

        let Some(path) = resolver.resolve(kubeconfig) else {
            debug!("no kubeconfig resolved, falling back to inferred configuration");
            return Self::config_inferred(auth).await;
        };

        info!(kubeconfig = %path, "using kubeconfig credentials");
        Self::config_from_kubeconfig(&path, auth).await
    }

    /// Build a configuration for a direct API server connection.
    fn config_from_api_server(api_server: &str, auth: &AuthConfig) -> Result<Config, KubrunError> {
        let cluster_url = api_server.parse().map_err(|_| {
            KubrunError::from(ConfigError::InvalidValue {
                field: String::from("auth.api_server"),
                reason: format!("'{api_server}' is not a valid URL"),
            })
        })?;

        let mut config = Config::new(cluster_url);
        config.accept_invalid_certs = auth.insecure;
        config.auth_info.token = auth.token.clone().map(Into::into);
        config.auth_info.username = auth.username.clone();
        config.auth_info.password = auth.password.clone().map(Into::into);

        Ok(config)
    }

    /// Build a configuration from an explicit kubeconfig file.
    async fn config_from_kubeconfig(
        path: &Utf8Path,
        auth: &AuthConfig,
    ) -> Result<Config, KubrunError> {
        let kubeconfig = Kubeconfig::read_from(path.as_std_path()).map_err(|e| {
            KubrunError::from(ConfigError::ClientBuildFailed {
                source_name: path.as_str().to_owned(),
                message: e.to_string(),
            })
        })?;

        let mut config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| {
                KubrunError::from(ConfigError::ClientBuildFailed {
                    source_name: path.as_str().to_owned(),
                    message: e.to_string(),
                })
            })?;

        if auth.insecure {
            config.accept_invalid_certs = true;
        }

        Ok(config)
    }

    /// Build an inferred configuration (in-cluster or client defaults).
    ///
    /// An inference failure means no credential source was usable at all, so
    /// it surfaces as `ConfigError::CredentialsNotFound`.
    async fn config_inferred(auth: &AuthConfig) -> Result<Config, KubrunError> {
        let mut config = Config::infer().await.map_err(|error| {
            debug!(%error, "configuration inference failed");
            KubrunError::from(ConfigError::CredentialsNotFound)
        })?;

        if auth.insecure {
            config.accept_invalid_certs = true;
        }

        Ok(config)
    }
}
