//! The cluster API seam and its Kubernetes-backed implementation.
//!
//! This module wraps the `kube` APIs behind a small trait so the execution
//! pipeline can be unit-tested without a live cluster. The watch surface is
//! strongly typed: subscribers receive [`JobStatusEvent`] values carrying
//! exactly the fields the completion predicate needs, not whole job
//! resources.

use std::future::Future;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::Client;
use kube::api::{Api, DeleteParams, ListParams, LogParams, ObjectMeta, PostParams};
use kube::runtime::watcher;
use tracing::warn;

/// Boxed future type returned by [`ClusterApi`] implementors.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, kube::Error>> + Send + 'a>>;

/// Boxed stream of strongly-typed job status events.
///
/// The stream is forward-only: implementations must not replay historical
/// state, only deliver updates observed after subscription.
pub type JobEventStream = Pin<Box<dyn Stream<Item = JobStatusEvent> + Send>>;

/// A point-in-time snapshot of one job's completion status.
///
/// Delivered by [`ClusterApi::watch_jobs`]; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusEvent {
    /// The name of the job the event describes.
    pub job_name: String,
    /// The number of pod executions under the job that finished
    /// successfully.
    pub succeeded: i32,
}

/// The job resource to submit: one container running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    /// Job resource name, unique per session.
    pub job_name: String,
    /// Container name, correlated with the job name via a shared suffix.
    pub container_name: String,
    /// Container image reference.
    pub image: String,
    /// Command argv to run in the container.
    pub command: Vec<String>,
}

/// Behaviour required from the cluster by the execution pipeline.
///
/// This abstraction exists to keep the pipeline testable without a live
/// cluster. Errors are surfaced as `kube::Error` and mapped to semantic
/// errors at the call sites that know which pipeline phase failed.
pub trait ClusterApi: Send + Sync {
    /// Fetch a namespace by name. Any error is treated by callers as the
    /// namespace being absent.
    fn get_namespace(&self, name: &str) -> ApiFuture<'_, ()>;

    /// Create a namespace with the given name.
    fn create_namespace(&self, name: &str) -> ApiFuture<'_, ()>;

    /// Delete a namespace by name.
    fn delete_namespace(&self, name: &str) -> ApiFuture<'_, ()>;

    /// Submit a job resource to the given namespace.
    fn create_job(&self, namespace: &str, job: &JobRequest) -> ApiFuture<'_, ()>;

    /// Delete a job resource by name.
    fn delete_job(&self, namespace: &str, name: &str) -> ApiFuture<'_, ()>;

    /// Subscribe to job status changes in the given namespace.
    ///
    /// The subscription delivers forward-looking updates only; the initial
    /// listing is suppressed. The stream ends only when the subscription is
    /// torn down (production implementations retry transport failures
    /// internally).
    fn watch_jobs(&self, namespace: &str) -> JobEventStream;

    /// List the names of pods spawned for the given job, selected by the
    /// `job-name` label.
    fn list_job_pods(&self, namespace: &str, job_name: &str) -> ApiFuture<'_, Vec<String>>;

    /// Delete a pod by name.
    fn delete_pod(&self, namespace: &str, name: &str) -> ApiFuture<'_, ()>;

    /// Retrieve a pod's full log.
    fn pod_logs(&self, namespace: &str, name: &str) -> ApiFuture<'_, String>;
}

/// Production [`ClusterApi`] implementation over a `kube::Client`.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Wrap an authenticated client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }

    fn jobs(&self, namespace: &str) -> Api<Job> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl ClusterApi for KubeCluster {
    fn get_namespace(&self, name: &str) -> ApiFuture<'_, ()> {
        let api = self.namespaces();
        let name_owned = String::from(name);
        Box::pin(async move { api.get(&name_owned).await.map(|_| ()) })
    }

    fn create_namespace(&self, name: &str) -> ApiFuture<'_, ()> {
        let api = self.namespaces();
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(String::from(name)),
                ..ObjectMeta::default()
            },
            ..Namespace::default()
        };
        Box::pin(async move {
            api.create(&PostParams::default(), &namespace)
                .await
                .map(|_| ())
        })
    }

    fn delete_namespace(&self, name: &str) -> ApiFuture<'_, ()> {
        let api = self.namespaces();
        let name_owned = String::from(name);
        Box::pin(async move {
            api.delete(&name_owned, &DeleteParams::default())
                .await
                .map(|_| ())
        })
    }

    fn create_job(&self, namespace: &str, job: &JobRequest) -> ApiFuture<'_, ()> {
        let api = self.jobs(namespace);
        let spec = build_job_resource(job);
        Box::pin(async move {
            let resource: Job = serde_json::from_value(spec).map_err(kube::Error::SerdeError)?;
            api.create(&PostParams::default(), &resource)
                .await
                .map(|_| ())
        })
    }

    fn delete_job(&self, namespace: &str, name: &str) -> ApiFuture<'_, ()> {
        let api = self.jobs(namespace);
        let name_owned = String::from(name);
        Box::pin(async move {
            api.delete(&name_owned, &DeleteParams::default())
                .await
                .map(|_| ())
        })
    }

    fn watch_jobs(&self, namespace: &str) -> JobEventStream {
        let api = self.jobs(namespace);
        let stream = watcher(api, watcher::Config::default()).filter_map(|entry| async move {
            match entry {
                // Forward-looking updates only: the watcher's initial listing
                // (Init/InitApply/InitDone) is replayed state and is dropped.
                Ok(watcher::Event::Apply(job)) => job_status_event(&job),
                Ok(_) => None,
                Err(error) => {
                    warn!(%error, "job watch interrupted; the watcher retries internally");
                    None
                }
            }
        });
        Box::pin(stream)
    }

    fn list_job_pods(&self, namespace: &str, job_name: &str) -> ApiFuture<'_, Vec<String>> {
        let api = self.pods(namespace);
        let params = ListParams::default().labels(&format!("job-name={job_name}"));
        Box::pin(async move {
            let pod_list = api.list(&params).await?;
            Ok(pod_list
                .into_iter()
                .filter_map(|pod| pod.metadata.name)
                .collect())
        })
    }

    fn delete_pod(&self, namespace: &str, name: &str) -> ApiFuture<'_, ()> {
        let api = self.pods(namespace);
        let name_owned = String::from(name);
        Box::pin(async move {
            api.delete(&name_owned, &DeleteParams::default())
                .await
                .map(|_| ())
        })
    }

    fn pod_logs(&self, namespace: &str, name: &str) -> ApiFuture<'_, String> {
        let api = self.pods(namespace);
        let name_owned = String::from(name);
        Box::pin(async move { api.logs(&name_owned, &LogParams::default()).await })
    }
}

/// Build the job resource payload for a [`JobRequest`].
///
/// `restartPolicy: Never` together with `backoffLimit: 0` pins the job to
/// single-attempt semantics: a failed container is never re-executed by the
/// platform.
fn build_job_resource(job: &JobRequest) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "batch/v1",
        "kind": "Job",
        "metadata": {
            "name": job.job_name,
        },
        "spec": {
            "backoffLimit": 0,
            "template": {
                "spec": {
                    "containers": [{
                        "name": job.container_name,
                        "image": job.image,
                        "command": job.command,
                    }],
                    "restartPolicy": "Never",
                }
            }
        }
    })
}

/// Map a job resource to its status event, skipping unnamed resources.
fn job_status_event(job: &Job) -> Option<JobStatusEvent> {
    let job_name = job.metadata.name.clone()?;
    let succeeded = job
        .status
        .as_ref()
        .and_then(|status| status.succeeded)
        .unwrap_or(0);
    Some(JobStatusEvent {
        job_name,
        succeeded,
    })
}
