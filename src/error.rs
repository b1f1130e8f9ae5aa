//! Semantic error types for the kubrun application.
//!
//! This module defines the error hierarchy for kubrun, following the principle
//! of using semantic error enums (via `thiserror`) for conditions the caller
//! might inspect or map to an exit code, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.
//!
//! The taxonomy mirrors the pipeline phases: configuration and credential
//! resolution, namespace provisioning, job submission, the completion watch,
//! log retrieval, and teardown. Timeouts are deliberately their own type —
//! a deadline expiring is not an API failure.

use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading, validation, and
/// cluster credential resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// No cluster credential source could be resolved.
    ///
    /// Raised when neither an API server URL, an explicit kubeconfig path,
    /// `$KUBECONFIG`, nor `$HOME/.kube/config` yields usable credentials.
    #[error("no cluster credentials found: provide --kubeconfig or --api-server")]
    CredentialsNotFound,

    /// Cluster credentials were found but a client could not be built from
    /// them.
    #[error("failed to build cluster client from '{source_name}': {message}")]
    ClientBuildFailed {
        /// The credential source that was used (a path or URL).
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// The `OrthoConfig` library returned an error during configuration
    /// loading.
    ///
    /// This wraps errors from the layered configuration system, including:
    /// - Configuration file parsing errors
    /// - Environment variable parsing errors
    /// - CLI argument parsing errors
    /// - Missing required fields after layer merging
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while provisioning the session namespace.
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// Creating the namespace on the cluster failed.
    #[error("failed to create namespace '{name}': {message}")]
    CreateFailed {
        /// The namespace that could not be created.
        name: String,
        /// A description of the creation failure.
        message: String,
    },
}

/// Errors that can occur while submitting the job resource.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Creating the job on the cluster failed.
    #[error("failed to submit job '{job_name}': {message}")]
    CreateFailed {
        /// The name of the job that could not be created.
        job_name: String,
        /// A description of the submission failure.
        message: String,
    },
}

/// Errors that can occur while watching for job completion.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The change-event subscription ended while the session was still
    /// watching.
    #[error("job watch for '{job_name}' ended before the job completed")]
    SubscriptionClosed {
        /// The job that was being watched.
        job_name: String,
    },
}

/// The completion deadline was reached before the job finished.
///
/// This is not an API failure: the cluster remained reachable, the job simply
/// did not complete in time.
#[derive(Debug, Error)]
pub enum TimeoutError {
    /// The configured deadline elapsed with no completion event.
    #[error("timed out after {seconds} seconds waiting for job '{job_name}' to complete")]
    DeadlineExceeded {
        /// The configured timeout in seconds.
        seconds: u64,
        /// The job that did not complete in time.
        job_name: String,
    },
}

/// Errors that can occur while retrieving pod logs.
#[derive(Debug, Error)]
pub enum LogRetrievalError {
    /// Listing the job's pods failed.
    #[error("failed to list pods for job '{job_name}': {message}")]
    ListFailed {
        /// The job whose pods could not be listed.
        job_name: String,
        /// A description of the failure.
        message: String,
    },

    /// Fetching one pod's log failed. Remaining pods are not attempted.
    #[error("failed to get log for pod '{pod_name}': {message}")]
    PodLogFailed {
        /// The pod whose log could not be read.
        pod_name: String,
        /// A description of the failure.
        message: String,
    },
}

/// Errors that can occur during best-effort teardown.
///
/// Cleanup is not transactional: a failed step aborts the remaining steps, so
/// partial cleanup is an observable outcome.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// Deleting the job resource failed.
    #[error("failed to delete job '{job_name}': {message}")]
    JobDeleteFailed {
        /// The job that could not be deleted.
        job_name: String,
        /// A description of the failure.
        message: String,
    },

    /// Listing the job's pods for deletion failed.
    #[error("failed to list pods for job '{job_name}' during cleanup: {message}")]
    PodListFailed {
        /// The job whose pods could not be listed.
        job_name: String,
        /// A description of the failure.
        message: String,
    },

    /// Deleting one of the job's pods failed.
    #[error("failed to delete pod '{pod_name}': {message}")]
    PodDeleteFailed {
        /// The pod that could not be deleted.
        pod_name: String,
        /// A description of the failure.
        message: String,
    },

    /// Deleting the session-owned namespace failed.
    #[error("failed to delete namespace '{name}': {message}")]
    NamespaceDeleteFailed {
        /// The namespace that could not be deleted.
        name: String,
        /// A description of the failure.
        message: String,
    },
}

/// Top-level error type for the kubrun application.
///
/// This enum aggregates all phase-specific errors into a single type that can
/// be used throughout the application. At the application boundary (main.rs),
/// these errors are converted to `eyre::Report` for human-readable error
/// reporting.
#[derive(Debug, Error)]
pub enum KubrunError {
    /// An error occurred during configuration or credential resolution.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while provisioning the namespace.
    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    /// An error occurred while submitting the job.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// An error occurred while watching for completion.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// The completion deadline was reached.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// An error occurred while retrieving pod logs.
    #[error(transparent)]
    LogRetrieval(#[from] LogRetrievalError),

    /// An error occurred during teardown.
    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    /// The blocking entry point could not create a tokio runtime.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreation {
        /// A description of the failure.
        message: String,
    },
}

/// A specialised `Result` type for kubrun operations.
pub type Result<T> = std::result::Result<T, KubrunError>;

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Report;
    use rstest::{fixture, rstest};

    /// Fixture providing a sample job name.
    #[fixture]
    fn job_name() -> String {
        String::from("kubrun-job-x7f3a")
    }

    /// Fixture providing a sample namespace name.
    #[fixture]
    fn namespace() -> String {
        String::from("kubrun-ns-b2c9d")
    }

    #[rstest]
    fn config_error_missing_required_displays_correctly() {
        let error = ConfigError::MissingRequired {
            field: String::from("image"),
        };
        assert_eq!(error.to_string(), "missing required configuration: image");
    }

    #[rstest]
    #[case(
        "timeout",
        "must be a non-negative integer",
        "invalid configuration value for 'timeout': must be a non-negative integer"
    )]
    #[case(
        "command",
        "must not be empty",
        "invalid configuration value for 'command': must not be empty"
    )]
    fn config_error_invalid_value_displays_correctly(
        #[case] field: &str,
        #[case] reason: &str,
        #[case] expected: &str,
    ) {
        let error = ConfigError::InvalidValue {
            field: String::from(field),
            reason: String::from(reason),
        };
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn config_error_credentials_not_found_displays_correctly() {
        let error = ConfigError::CredentialsNotFound;
        assert_eq!(
            error.to_string(),
            "no cluster credentials found: provide --kubeconfig or --api-server"
        );
    }

    #[rstest]
    fn namespace_error_create_failed_displays_correctly(namespace: String) {
        let error = NamespaceError::CreateFailed {
            name: namespace,
            message: String::from("namespaces is forbidden"),
        };
        assert_eq!(
            error.to_string(),
            "failed to create namespace 'kubrun-ns-b2c9d': namespaces is forbidden"
        );
    }

    #[rstest]
    fn submission_error_includes_job_name(job_name: String) {
        let error = SubmissionError::CreateFailed {
            job_name,
            message: String::from("admission webhook denied the request"),
        };
        assert_eq!(
            error.to_string(),
            "failed to submit job 'kubrun-job-x7f3a': admission webhook denied the request"
        );
    }

    #[rstest]
    fn watch_error_subscription_closed_displays_correctly(job_name: String) {
        let error = WatchError::SubscriptionClosed { job_name };
        assert_eq!(
            error.to_string(),
            "job watch for 'kubrun-job-x7f3a' ended before the job completed"
        );
    }

    #[rstest]
    fn timeout_error_reports_seconds_and_job(job_name: String) {
        let error = TimeoutError::DeadlineExceeded {
            seconds: 120,
            job_name,
        };
        assert_eq!(
            error.to_string(),
            "timed out after 120 seconds waiting for job 'kubrun-job-x7f3a' to complete"
        );
    }

    #[rstest]
    fn log_retrieval_error_names_failing_pod() {
        let error = LogRetrievalError::PodLogFailed {
            pod_name: String::from("kubrun-job-x7f3a-zl4qp"),
            message: String::from("container is still creating"),
        };
        assert_eq!(
            error.to_string(),
            "failed to get log for pod 'kubrun-job-x7f3a-zl4qp': container is still creating"
        );
    }

    #[rstest]
    fn cleanup_error_namespace_delete_displays_correctly(namespace: String) {
        let error = CleanupError::NamespaceDeleteFailed {
            name: namespace,
            message: String::from("conflict"),
        };
        assert_eq!(
            error.to_string(),
            "failed to delete namespace 'kubrun-ns-b2c9d': conflict"
        );
    }

    #[rstest]
    fn kubrun_error_wraps_config_error() {
        let config_error = ConfigError::MissingRequired {
            field: String::from("image"),
        };
        let kubrun_error: KubrunError = config_error.into();
        assert_eq!(
            kubrun_error.to_string(),
            "missing required configuration: image"
        );
    }

    #[rstest]
    fn kubrun_error_wraps_timeout_error(job_name: String) {
        let timeout_error = TimeoutError::DeadlineExceeded {
            seconds: 1,
            job_name,
        };
        let kubrun_error: KubrunError = timeout_error.into();
        assert_eq!(
            kubrun_error.to_string(),
            "timed out after 1 seconds waiting for job 'kubrun-job-x7f3a' to complete"
        );
    }

    #[rstest]
    #[case(
        KubrunError::from(ConfigError::CredentialsNotFound),
        "no cluster credentials found: provide --kubeconfig or --api-server"
    )]
    #[case(
        KubrunError::from(SubmissionError::CreateFailed {
            job_name: String::from("kubrun-job-x7f3a"),
            message: String::from("quota exceeded"),
        }),
        "failed to submit job 'kubrun-job-x7f3a': quota exceeded"
    )]
    #[case(
        KubrunError::from(CleanupError::JobDeleteFailed {
            job_name: String::from("kubrun-job-x7f3a"),
            message: String::from("not found"),
        }),
        "failed to delete job 'kubrun-job-x7f3a': not found"
    )]
    fn eyre_report_preserves_error_messages(#[case] error: KubrunError, #[case] expected: &str) {
        let report = Report::from(error);
        assert_eq!(report.to_string(), expected);
    }
}
