//! Cluster credential resolution, client construction, and the API seam.
//!
//! This module provides the interface for talking to a Kubernetes cluster.
//! Credentials are resolved through a priority-based fallback chain:
//!
//! 1. API server URL (`--api-server`, config file, or `KUBRUN_AUTH_API_SERVER`)
//! 2. CLI argument (`--kubeconfig`)
//! 3. Config file (`kubeconfig` in TOML) / `KUBRUN_KUBECONFIG`
//! 4. `KUBECONFIG` environment variable
//! 5. `$HOME/.kube/config` (when the file exists)
//! 6. Inferred in-cluster configuration
//!
//! All cluster operations consumed by the execution pipeline go through the
//! [`ClusterApi`] trait so tests can substitute a fake cluster.

mod api;
mod connection;

pub use api::{
    ApiFuture, ClusterApi, JobEventStream, JobRequest, JobStatusEvent, KubeCluster,
};
pub use connection::{ClusterConnector, CredentialResolver};
