//! Pod log collection for a completed job.

use tracing::debug;

use crate::cluster::ClusterApi;
use crate::error::LogRetrievalError;

/// Retrieves the logs of the pods a job spawned.
pub struct LogCollector<'a> {
    cluster: &'a dyn ClusterApi,
}

impl<'a> LogCollector<'a> {
    /// Create a collector over the given cluster.
    #[must_use]
    pub const fn new(cluster: &'a dyn ClusterApi) -> Self {
        Self { cluster }
    }

    /// Collect the job's output from its pods.
    ///
    /// Pods are selected by the `job-name` label and their logs buffered
    /// fully into memory, concatenated in pod-list order. With the job's
    /// single-attempt settings there is normally exactly one pod; when the
    /// platform produced more, every pod's output is kept.
    ///
    /// # Errors
    ///
    /// Returns `LogRetrievalError::ListFailed` when the pods cannot be
    /// listed, and `LogRetrievalError::PodLogFailed` naming the first pod
    /// whose log could not be read; remaining pods are not attempted.
    pub async fn collect(
        &self,
        namespace: &str,
        job_name: &str,
    ) -> Result<String, LogRetrievalError> {
        let pods = self
            .cluster
            .list_job_pods(namespace, job_name)
            .await
            .map_err(|e| LogRetrievalError::ListFailed {
                job_name: String::from(job_name),
                message: e.to_string(),
            })?;

        debug!(job = job_name, pods = pods.len(), "collecting pod logs");

        let mut stdout = String::new();
        for pod_name in pods {
            let log = self
                .cluster
                .pod_logs(namespace, &pod_name)
                .await
                .map_err(|e| LogRetrievalError::PodLogFailed {
                    pod_name: pod_name.clone(),
                    message: e.to_string(),
                })?;
            stdout.push_str(&log);
        }

        Ok(stdout)
    }
}
