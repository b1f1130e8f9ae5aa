//! Job construction and submission.

use tracing::debug;

use crate::cluster::{ClusterApi, JobRequest};
use crate::error::SubmissionError;
use crate::run::names::{NameGenerator, RESOURCE_PREFIX};
use crate::run::request::ExecutionRequest;

/// The names under which a job was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    /// The job resource name.
    pub job_name: String,
    /// The container name inside the job's pod template.
    pub container_name: String,
}

/// Builds and submits the job resource for a session.
pub struct JobSubmitter<'a> {
    cluster: &'a dyn ClusterApi,
}

impl<'a> JobSubmitter<'a> {
    /// Create a submitter over the given cluster.
    #[must_use]
    pub const fn new(cluster: &'a dyn ClusterApi) -> Self {
        Self { cluster }
    }

    /// Submit the request's image and command as a single-attempt job.
    ///
    /// The job and container names share one random suffix, so they are
    /// correlated but each unique within the session.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::CreateFailed` when the cluster rejects the
    /// job; the session aborts before any watch begins.
    pub async fn submit(
        &self,
        namespace: &str,
        request: &ExecutionRequest,
        names: &dyn NameGenerator,
    ) -> Result<SubmittedJob, SubmissionError> {
        let suffix = names.suffix();
        let job_name = format!("{RESOURCE_PREFIX}-job-{suffix}");
        let container_name = format!("{RESOURCE_PREFIX}-container-{suffix}");

        debug!(job = %job_name, namespace, "creating job");

        let job = JobRequest {
            job_name: job_name.clone(),
            container_name: container_name.clone(),
            image: request.image().to_owned(),
            command: request.command().to_vec(),
        };

        self.cluster
            .create_job(namespace, &job)
            .await
            .map_err(|e| SubmissionError::CreateFailed {
                job_name: job_name.clone(),
                message: e.to_string(),
            })?;

        Ok(SubmittedJob {
            job_name,
            container_name,
        })
    }
}
