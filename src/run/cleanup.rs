//! Best-effort teardown of session resources.

use tracing::info;

use crate::cluster::ClusterApi;
use crate::error::CleanupError;
use crate::run::request::ExecutionSession;

/// Deletes the resources a session created.
pub struct CleanupManager<'a> {
    cluster: &'a dyn ClusterApi,
}

impl<'a> CleanupManager<'a> {
    /// Create a manager over the given cluster.
    #[must_use]
    pub const fn new(cluster: &'a dyn ClusterApi) -> Self {
        Self { cluster }
    }

    /// Tear down the session's job, pods, and (when owned) namespace.
    ///
    /// A no-op when `enabled` is false. Steps run in order — job, pods,
    /// namespace — and each is only attempted if the previous succeeded, so
    /// partial cleanup is an observable outcome. An externally-supplied
    /// namespace is never deleted.
    ///
    /// # Errors
    ///
    /// Returns `CleanupError` for the first failing step; subsequent steps
    /// are not attempted.
    pub async fn run(
        &self,
        session: &ExecutionSession,
        enabled: bool,
    ) -> Result<(), CleanupError> {
        if !enabled {
            info!("ignoring cleanup upon request");
            return Ok(());
        }

        info!(
            job = session.job_name(),
            namespace = session.namespace(),
            "cleaning up created resources"
        );

        self.cluster
            .delete_job(session.namespace(), session.job_name())
            .await
            .map_err(|e| CleanupError::JobDeleteFailed {
                job_name: session.job_name().to_owned(),
                message: e.to_string(),
            })?;

        let pods = self
            .cluster
            .list_job_pods(session.namespace(), session.job_name())
            .await
            .map_err(|e| CleanupError::PodListFailed {
                job_name: session.job_name().to_owned(),
                message: e.to_string(),
            })?;

        for pod_name in pods {
            self.cluster
                .delete_pod(session.namespace(), &pod_name)
                .await
                .map_err(|e| CleanupError::PodDeleteFailed {
                    pod_name: pod_name.clone(),
                    message: e.to_string(),
                })?;
        }

        if session.namespace_owned() {
            self.cluster
                .delete_namespace(session.namespace())
                .await
                .map_err(|e| CleanupError::NamespaceDeleteFailed {
                    name: session.namespace().to_owned(),
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }
}
