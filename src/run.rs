//! The execution pipeline: one job, one session, one linear flow.
//!
//! This module provides the library-facing orchestration for a kubrun
//! session. [`execute_async`] sequences the pipeline stages — namespace
//! provisioning, job submission, the completion watch, log collection, and
//! teardown — over the [`ClusterApi`](crate::cluster::ClusterApi) seam;
//! [`execute`] is the blocking wrapper that resolves credentials, builds the
//! client, and owns a dedicated tokio runtime.
//!
//! Session state is threaded through the stages explicitly: each stage
//! receives what it needs and returns what it produced, and only the
//! watcher's single completion signal ever crosses a task boundary.
//!
//! Functions here do not print to stdout/stderr or call
//! `std::process::exit`; the CLI adapter owns output and exit codes.

mod cleanup;
mod logs;
mod names;
mod namespace;
mod request;
mod submit;
mod watch;

#[cfg(test)]
mod tests;

pub use cleanup::CleanupManager;
pub use logs::LogCollector;
pub use names::{NameGenerator, RESOURCE_PREFIX, RandomNameGenerator};
pub use namespace::{NamespaceManager, ResolvedNamespace};
pub use request::{ExecutionRequest, ExecutionSession, SessionOutcome};
pub use submit::{JobSubmitter, SubmittedJob};
pub use watch::{CompletionWatcher, WatchVerdict};

use tracing::{debug, warn};

use crate::cluster::{ClusterApi, ClusterConnector, CredentialResolver, KubeCluster};
use crate::config::AppConfig;
use crate::error::{CleanupError, KubrunError, Result, TimeoutError};

/// Outcome of a completed kubrun session.
///
/// Only produced for sessions whose job actually completed; timeouts and
/// phase failures surface as [`KubrunError`] values instead. A cleanup
/// failure does not retroactively fail the completed run — the captured
/// output is still delivered and the failure is reported alongside it.
#[derive(Debug)]
pub struct ExecutionReport {
    /// The job's captured standard output (concatenated pod logs).
    pub stdout: String,
    /// The job's captured standard error.
    pub stderr: String,
    /// The teardown failure, if cleanup was attempted and failed.
    pub cleanup_error: Option<CleanupError>,
}

/// Parameters for running a job from merged configuration.
///
/// Groups the arguments required by [`execute`] into a single struct to
/// satisfy the "no more than four parameters" convention.
pub struct RunParams<'a, E: mockable::Env> {
    /// Merged application configuration.
    pub config: &'a AppConfig,
    /// Command argv to run in the container.
    pub command: Vec<String>,
    /// Environment variable provider for credential resolution.
    pub env: &'a E,
}

/// Run a job to completion, blocking the calling thread.
///
/// Validates the request, resolves credentials, connects to the cluster, and
/// drives [`execute_async`] on a dedicated tokio runtime.
///
/// # Errors
///
/// Returns `KubrunError::RuntimeCreation` if the runtime cannot be built,
/// plus every error [`execute_async`] and the connection phase can produce.
pub fn execute<E: mockable::Env>(params: RunParams<'_, E>) -> Result<ExecutionReport> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| KubrunError::RuntimeCreation {
        message: e.to_string(),
    })?;
    runtime.block_on(connect_and_execute(params))
}

/// Resolve credentials, build the cluster client, and run the pipeline.
async fn connect_and_execute<E: mockable::Env>(
    params: RunParams<'_, E>,
) -> Result<ExecutionReport> {
    let RunParams {
        config,
        command,
        env,
    } = params;

    // Request validation comes first: a missing image or command must fail
    // before any cluster interaction.
    let request = ExecutionRequest::from_config(config, command)?;

    let resolver = CredentialResolver::new(env);
    let client =
        ClusterConnector::connect(&config.auth, config.kubeconfig.as_deref(), &resolver).await?;
    let cluster = KubeCluster::new(client);
    let names = RandomNameGenerator;

    execute_async(&cluster, &names, &request).await
}

/// Run the execution pipeline against an already-connected cluster.
///
/// Stage order: ensure namespace, submit job, race the completion watch
/// against the deadline, collect logs on completion, then tear down.
/// Teardown always runs once watching has begun (unless disabled by the
/// request), even when the watch timed out or log collection failed.
///
/// Errors in the namespace and submission phases abort the run with no
/// cleanup attempted; a namespace created immediately before a failed
/// submission is deliberately left behind.
///
/// # Errors
///
/// Returns the failing phase's error: `NamespaceError`, `SubmissionError`,
/// `WatchError`, `TimeoutError`, or `LogRetrievalError`. A `CleanupError`
/// is only returned through the report when the job itself completed.
pub async fn execute_async(
    cluster: &dyn ClusterApi,
    names: &dyn NameGenerator,
    request: &ExecutionRequest,
) -> Result<ExecutionReport> {
    let resolved = NamespaceManager::new(cluster, names)
        .ensure(request.namespace())
        .await?;

    let submitted = JobSubmitter::new(cluster)
        .submit(&resolved.name, request, names)
        .await?;

    let mut session = ExecutionSession::new(resolved, submitted);

    let verdict = CompletionWatcher::new(cluster)
        .wait(
            session.namespace(),
            session.job_name(),
            request.timeout_secs(),
        )
        .await;

    let pipeline_error = settle_watch_verdict(cluster, &mut session, request, verdict).await;

    debug!(outcome = ?session.outcome(), "watch settled, proceeding to teardown gate");

    let cleanup_result = CleanupManager::new(cluster)
        .run(&session, request.cleanup())
        .await;

    if let Some(error) = pipeline_error {
        if let Err(cleanup_error) = cleanup_result {
            warn!(%cleanup_error, "cleanup failed after an earlier pipeline error");
        }
        return Err(error);
    }

    let (stdout, stderr) = session.into_output();
    Ok(ExecutionReport {
        stdout,
        stderr,
        cleanup_error: cleanup_result.err(),
    })
}

/// Record the watch verdict on the session, collecting logs on completion.
///
/// Returns the error to surface after cleanup has run, if any.
async fn settle_watch_verdict(
    cluster: &dyn ClusterApi,
    session: &mut ExecutionSession,
    request: &ExecutionRequest,
    verdict: std::result::Result<WatchVerdict, crate::error::WatchError>,
) -> Option<KubrunError> {
    match verdict {
        Ok(WatchVerdict::Completed) => {
            session.set_outcome(SessionOutcome::Completed);
            let collected = LogCollector::new(cluster)
                .collect(session.namespace(), session.job_name())
                .await;
            match collected {
                Ok(stdout) => session.set_stdout(stdout),
                Err(error) => return Some(error.into()),
            }
            None
        }
        Ok(WatchVerdict::TimedOut) => {
            session.set_outcome(SessionOutcome::TimedOut);
            warn!(
                job = session.job_name(),
                "timeout while waiting for the job to complete"
            );
            Some(
                TimeoutError::DeadlineExceeded {
                    seconds: request.timeout_secs(),
                    job_name: session.job_name().to_owned(),
                }
                .into(),
            )
        }
        Err(watch_error) => {
            session.set_outcome(SessionOutcome::Failed);
            Some(watch_error.into())
        }
    }
}
