//! Execution request validation and per-run session state.

use crate::config::AppConfig;
use crate::error::{ConfigError, KubrunError};
use crate::run::namespace::ResolvedNamespace;
use crate::run::submit::SubmittedJob;

/// Default completion deadline in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Immutable input describing one job to run.
///
/// Construction validates the invariants the pipeline relies on: the image
/// and the command must be non-empty before submission begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    namespace: Option<String>,
    image: String,
    command: Vec<String>,
    timeout_secs: u64,
    cleanup: bool,
}

impl ExecutionRequest {
    /// Create a request for an image and command.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `image` or `command` is
    /// empty, and `ConfigError::InvalidValue` when the command's executable
    /// token is blank.
    pub fn new(image: impl Into<String>, command: Vec<String>) -> Result<Self, KubrunError> {
        let image_value = image.into();
        let validated_image = String::from(validate_required_field("image", &image_value)?);
        let validated_command = validate_command(command)?;

        Ok(Self {
            namespace: None,
            image: validated_image,
            command: validated_command,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cleanup: true,
        })
    }

    /// Build a request from merged configuration and the CLI command.
    ///
    /// # Errors
    ///
    /// Returns the same validation errors as [`Self::new`]; a configuration
    /// with no image at all reports `image` as missing.
    pub fn from_config(config: &AppConfig, command: Vec<String>) -> Result<Self, KubrunError> {
        Ok(Self::new(config.image.clone().unwrap_or_default(), command)?
            .with_namespace(config.namespace.clone())
            .with_timeout_secs(config.timeout_secs)
            .with_cleanup(config.cleanup))
    }

    /// Attach an optional pre-existing namespace name.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|value| !value.trim().is_empty());
        self
    }

    /// Set the completion deadline in seconds. Zero waits indefinitely.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Control teardown of created resources.
    #[must_use]
    pub const fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Return the requested namespace, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Return the container image reference.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Return the command argv.
    #[must_use]
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Return the completion deadline in seconds (0 = unbounded).
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Return whether created resources are torn down after the run.
    #[must_use]
    pub const fn cleanup(&self) -> bool {
        self.cleanup
    }
}

/// Terminal state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The completion watch is still (or was still) in progress.
    Watching,
    /// A completion event arrived before the deadline.
    Completed,
    /// The deadline elapsed before any completion event.
    TimedOut,
    /// The watch itself failed.
    Failed,
}

/// Mutable state owned by the orchestrator for one run.
///
/// Created once per session after submission succeeds and mutated only by
/// the pipeline stage currently executing. Discarded when the process exits;
/// nothing is persisted.
#[derive(Debug)]
pub struct ExecutionSession {
    namespace: String,
    namespace_owned: bool,
    job_name: String,
    container_name: String,
    stdout: String,
    stderr: String,
    outcome: SessionOutcome,
}

impl ExecutionSession {
    /// Assemble the session from the provisioning stages' results.
    pub(crate) fn new(resolved: ResolvedNamespace, submitted: SubmittedJob) -> Self {
        Self {
            namespace: resolved.name,
            namespace_owned: resolved.owned,
            job_name: submitted.job_name,
            container_name: submitted.container_name,
            stdout: String::new(),
            stderr: String::new(),
            outcome: SessionOutcome::Watching,
        }
    }

    /// Return the resolved namespace name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Return whether this session created the namespace.
    #[must_use]
    pub const fn namespace_owned(&self) -> bool {
        self.namespace_owned
    }

    /// Return the generated job name.
    #[must_use]
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Return the generated container name.
    #[must_use]
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Return the captured standard output.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Return the captured standard error.
    ///
    /// The platform folds container stderr into the pod log, so this buffer
    /// stays empty unless a future log source separates the streams.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Return the session's terminal outcome.
    #[must_use]
    pub const fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    /// Record the captured standard output.
    pub(crate) fn set_stdout(&mut self, stdout: String) {
        self.stdout = stdout;
    }

    /// Record the terminal outcome.
    pub(crate) const fn set_outcome(&mut self, outcome: SessionOutcome) {
        self.outcome = outcome;
    }

    /// Consume the session, yielding the captured output buffers.
    pub(crate) fn into_output(self) -> (String, String) {
        (self.stdout, self.stderr)
    }
}

fn validate_command(command: Vec<String>) -> Result<Vec<String>, KubrunError> {
    if command.is_empty() {
        return Err(KubrunError::from(ConfigError::MissingRequired {
            field: String::from("command"),
        }));
    }

    let executable = command.first().map(String::as_str).unwrap_or_default();
    if executable.trim().is_empty() {
        return Err(KubrunError::from(ConfigError::InvalidValue {
            field: String::from("command"),
            reason: String::from("command executable must not be empty"),
        }));
    }

    Ok(command)
}

fn validate_required_field<'a>(field: &str, value: &'a str) -> Result<&'a str, KubrunError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KubrunError::from(ConfigError::MissingRequired {
            field: String::from(field),
        }));
    }

    Ok(trimmed)
}
