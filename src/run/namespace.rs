//! Namespace provisioning with ownership tracking.

use tracing::info;

use crate::cluster::ClusterApi;
use crate::error::NamespaceError;
use crate::run::names::{NameGenerator, RESOURCE_PREFIX};

/// The namespace a session runs in, and whether the session created it.
///
/// Ownership gates teardown: an externally-supplied, pre-existing namespace
/// is never deleted or recreated by kubrun.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNamespace {
    /// The namespace name all session resources live in.
    pub name: String,
    /// True iff this session created the namespace.
    pub owned: bool,
}

/// Ensures a usable namespace exists for the session.
pub struct NamespaceManager<'a> {
    cluster: &'a dyn ClusterApi,
    names: &'a dyn NameGenerator,
}

impl<'a> NamespaceManager<'a> {
    /// Create a manager over the given cluster and name generator.
    #[must_use]
    pub const fn new(cluster: &'a dyn ClusterApi, names: &'a dyn NameGenerator) -> Self {
        Self { cluster, names }
    }

    /// Resolve the session namespace, creating it when necessary.
    ///
    /// With no requested name, a `kubrun-ns-<suffix>` namespace is generated
    /// and owned. A requested name is probed first; any lookup failure is
    /// treated as the namespace being absent, and the session takes
    /// ownership by creating it.
    ///
    /// # Errors
    ///
    /// Returns `NamespaceError::CreateFailed` when an owned namespace cannot
    /// be created; the session must abort.
    pub async fn ensure(
        &self,
        requested: Option<&str>,
    ) -> Result<ResolvedNamespace, NamespaceError> {
        let (name, mut owned) = requested.map_or_else(
            || {
                let generated = format!("{RESOURCE_PREFIX}-ns-{}", self.names.suffix());
                info!(
                    namespace = %generated,
                    "no namespace provided, attempting to create a new one"
                );
                (generated, true)
            },
            |existing| (String::from(existing), false),
        );

        if !owned {
            if let Err(error) = self.cluster.get_namespace(&name).await {
                info!(
                    namespace = %name,
                    %error,
                    "provided namespace does not exist, attempting to create it"
                );
                owned = true;
            }
        }

        if owned {
            self.cluster
                .create_namespace(&name)
                .await
                .map_err(|e| NamespaceError::CreateFailed {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(ResolvedNamespace { name, owned })
    }
}
