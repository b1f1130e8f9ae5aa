//! The completion watch: one signal racing one deadline.
//!
//! After submission the session enters the watching state. A background task
//! consumes the job-event subscription and evaluates the completion
//! predicate on every event; the orchestrator blocks on a race between that
//! task's single completion signal and a deadline timer. Whichever arrives
//! first decides the terminal state, and the subscription task is stopped
//! explicitly on either outcome so it never outlives the race.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::cluster::{ClusterApi, JobEventStream, JobStatusEvent};
use crate::error::WatchError;

/// How the watching state resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchVerdict {
    /// A qualifying completion event arrived before the deadline.
    Completed,
    /// The deadline elapsed first.
    TimedOut,
}

/// Watches a job's change events for completion, bounded by a deadline.
pub struct CompletionWatcher<'a> {
    cluster: &'a dyn ClusterApi,
}

impl<'a> CompletionWatcher<'a> {
    /// Create a watcher over the given cluster.
    #[must_use]
    pub const fn new(cluster: &'a dyn ClusterApi) -> Self {
        Self { cluster }
    }

    /// Wait for the job to complete or the deadline to pass.
    ///
    /// A timeout of zero waits indefinitely: the deadline timer still runs,
    /// mapped to the largest representable duration (tokio saturates
    /// far-future deadlines rather than firing them).
    ///
    /// # Errors
    ///
    /// Returns `WatchError::SubscriptionClosed` if the event subscription
    /// ends while the session is still watching.
    pub async fn wait(
        &self,
        namespace: &str,
        job_name: &str,
        timeout_secs: u64,
    ) -> Result<WatchVerdict, WatchError> {
        let stream = self.cluster.watch_jobs(namespace);

        // Single-slot signal channel: the subscription task writes it with
        // try_send, the race below reads it exactly once.
        let (signal_tx, mut signal_rx) = mpsc::channel::<()>(1);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let subscription = tokio::spawn(watch_for_completion(
            stream,
            String::from(job_name),
            signal_tx,
            stop_rx,
        ));

        info!(job = job_name, "waiting for the job to complete");

        let deadline = sleep(effective_timeout(timeout_secs));
        tokio::pin!(deadline);

        let verdict = tokio::select! {
            signal = signal_rx.recv() => match signal {
                Some(()) => Ok(WatchVerdict::Completed),
                None => Err(WatchError::SubscriptionClosed {
                    job_name: String::from(job_name),
                }),
            },
            () = &mut deadline => Ok(WatchVerdict::TimedOut),
        };

        // Stop the subscription task on every outcome so it cannot leak past
        // the session.
        if stop_tx.send(()).is_err() {
            debug!("subscription task already finished");
        }
        if let Err(error) = subscription.await {
            debug!(%error, "subscription task join failed");
        }

        verdict
    }
}

/// Consume the event subscription until completion, stop, or stream end.
///
/// Delivers at most one completion signal. Further qualifying events find
/// the single-slot channel full and are dropped without blocking.
async fn watch_for_completion(
    mut stream: JobEventStream,
    job_name: String,
    signal: mpsc::Sender<()>,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut stop => break,
            delivered = stream.next() => match delivered {
                Some(event) if job_completed(&event, &job_name) => {
                    if signal.try_send(()).is_err() {
                        debug!(job = %job_name, "completion already signalled");
                    }
                }
                Some(_) => {}
                None => break,
            }
        }
    }
}

/// The completion predicate: this session's job has succeeded pods.
fn job_completed(event: &JobStatusEvent, job_name: &str) -> bool {
    event.job_name == job_name && event.succeeded > 0
}

/// Map the configured timeout to the deadline duration.
const fn effective_timeout(timeout_secs: u64) -> Duration {
    if timeout_secs == 0 {
        Duration::MAX
    } else {
        Duration::from_secs(timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::{JobStatusEvent, effective_timeout, job_completed};
    use rstest::rstest;
    use std::time::Duration;

    fn event(job_name: &str, succeeded: i32) -> JobStatusEvent {
        JobStatusEvent {
            job_name: String::from(job_name),
            succeeded,
        }
    }

    #[rstest]
    #[case(event("kubrun-job-aaaaa", 1), true)]
    #[case(event("kubrun-job-aaaaa", 3), true)]
    #[case(event("kubrun-job-aaaaa", 0), false)]
    #[case(event("kubrun-job-other", 1), false)]
    fn completion_predicate_requires_this_job_and_success(
        #[case] status: JobStatusEvent,
        #[case] expected: bool,
    ) {
        assert_eq!(job_completed(&status, "kubrun-job-aaaaa"), expected);
    }

    #[rstest]
    fn zero_timeout_maps_to_largest_duration() {
        assert_eq!(effective_timeout(0), Duration::MAX);
    }

    #[rstest]
    fn nonzero_timeout_maps_to_seconds() {
        assert_eq!(effective_timeout(30), Duration::from_secs(30));
    }
}
