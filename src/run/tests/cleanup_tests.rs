//! Tests for teardown ordering and gating.

use crate::error::CleanupError;
use crate::run::tests::fake_cluster::FakeCluster;
use crate::run::{CleanupManager, ExecutionSession, ResolvedNamespace, SubmittedJob};

const NAMESPACE: &str = "kubrun-ns-aaaaa";
const JOB: &str = "kubrun-job-bbbbb";

fn session(owned: bool) -> ExecutionSession {
    ExecutionSession::new(
        ResolvedNamespace {
            name: String::from(NAMESPACE),
            owned,
        },
        SubmittedJob {
            job_name: String::from(JOB),
            container_name: String::from("kubrun-container-bbbbb"),
        },
    )
}

#[tokio::test]
async fn teardown_deletes_job_then_pods_then_owned_namespace() {
    let (mut cluster, _events) = FakeCluster::new();
    cluster.add_pod("pod-a", "");
    cluster.add_pod("pod-b", "");

    CleanupManager::new(&cluster)
        .run(&session(true), true)
        .await
        .expect("cleanup should succeed");

    assert_eq!(
        cluster.calls(),
        vec![
            format!("delete_job {NAMESPACE} {JOB}"),
            format!("list_job_pods {NAMESPACE} {JOB}"),
            format!("delete_pod {NAMESPACE} pod-a"),
            format!("delete_pod {NAMESPACE} pod-b"),
            format!("delete_namespace {NAMESPACE}"),
        ]
    );
}

#[tokio::test]
async fn disabled_cleanup_touches_nothing() {
    let (mut cluster, _events) = FakeCluster::new();
    cluster.add_pod("pod-a", "");

    CleanupManager::new(&cluster)
        .run(&session(true), false)
        .await
        .expect("disabled cleanup should be a no-op");

    assert!(cluster.calls().is_empty());
}

#[tokio::test]
async fn unowned_namespace_survives_teardown() {
    let (mut cluster, _events) = FakeCluster::new();
    cluster.add_pod("pod-a", "");

    CleanupManager::new(&cluster)
        .run(&session(false), true)
        .await
        .expect("cleanup should succeed");

    let calls = cluster.calls();
    assert!(calls.contains(&format!("delete_job {NAMESPACE} {JOB}")));
    assert!(!calls.iter().any(|call| call.starts_with("delete_namespace")));
}

#[tokio::test]
async fn job_delete_failure_stops_before_pods() {
    let (mut cluster, _events) = FakeCluster::new();
    cluster.add_pod("pod-a", "");
    cluster.fail("delete_job");

    let result = CleanupManager::new(&cluster).run(&session(true), true).await;

    assert!(matches!(result, Err(CleanupError::JobDeleteFailed { .. })));
    assert_eq!(cluster.calls(), vec![format!("delete_job {NAMESPACE} {JOB}")]);
}

#[tokio::test]
async fn pod_delete_failure_stops_before_namespace() {
    let (mut cluster, _events) = FakeCluster::new();
    cluster.add_pod("pod-a", "");
    cluster.fail("delete_pod");

    let result = CleanupManager::new(&cluster).run(&session(true), true).await;

    match result {
        Err(CleanupError::PodDeleteFailed { pod_name, .. }) => {
            assert_eq!(pod_name, "pod-a");
        }
        other => panic!("expected pod delete failure, got {other:?}"),
    }
    assert!(
        !cluster
            .calls()
            .iter()
            .any(|call| call.starts_with("delete_namespace"))
    );
}

#[tokio::test]
async fn pod_list_failure_stops_before_pod_deletes() {
    let (mut cluster, _events) = FakeCluster::new();
    cluster.add_pod("pod-a", "");
    cluster.fail("list_job_pods");

    let result = CleanupManager::new(&cluster).run(&session(true), true).await;

    assert!(matches!(result, Err(CleanupError::PodListFailed { .. })));
    assert!(
        !cluster
            .calls()
            .iter()
            .any(|call| call.starts_with("delete_pod"))
    );
}
