//! Run a containerized command as a Kubernetes Job and capture its output.
//!
//! `kubrun` submits a single-container Job to a Kubernetes cluster, waits for
//! it to complete (or time out), collects the pod logs as the command's
//! output, and tears down everything it created. Each invocation is one
//! disposable session: no job pools, no retries, no state survives the
//! process.
//!
//! # Architecture
//!
//! The pipeline is linear: resolve credentials and build a client, ensure a
//! namespace exists (generating and owning one when none is supplied), submit
//! the job, race a completion-event subscription against a deadline, collect
//! logs on completion, and run best-effort cleanup. The cluster API is
//! consumed through the [`cluster::ClusterApi`] seam so the whole pipeline is
//! testable against a fake cluster.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`cluster`]: Credential resolution, client construction, and the cluster API seam
//! - [`run`]: The execution pipeline — namespace, submission, watch, logs, cleanup
//! - [`error`]: Semantic error types for the application

pub mod cluster;
pub mod config;
pub mod error;
pub mod run;
