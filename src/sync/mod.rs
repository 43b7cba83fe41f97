//! Query synchronisation with generation tokens
//!
//! A page owns one [`QuerySynchronizer`] per independently refreshed slice of
//! its state. Every parameter change issues a new request through it; the
//! request runs as its own task and is tagged with a monotonically increasing
//! [`Generation`]. The page is the single consumer of completions and only a
//! completion carrying the latest generation may commit.
//!
//! # Flow
//!
//! ```text
//! set_criteria(X) ──issue──▶ task(gen 1) ─┐
//! set_criteria(Y) ──issue──▶ task(gen 2) ─┤
//!                                         ▼
//!                         next() in arrival order
//!                    gen 2 ──▶ Fresh  (commit Y)
//!                    gen 1 ──▶ Stale  (dropped)
//! ```
//!
//! Superseded requests are not cancelled; their results are discarded when
//! they arrive. Closing (or dropping) the synchronizer aborts everything in
//! flight and suppresses any later completion.

use crate::client::RemoteResult;
use crate::core::error::PortalError;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use tokio::task::JoinSet;

/// Request generation token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a completed request means for the state slice
#[derive(Debug)]
pub enum Outcome<T> {
    /// Latest request succeeded; replace the slice wholesale
    Fresh { generation: Generation, value: T },
    /// Latest request failed; keep the last-good slice
    Failed {
        generation: Generation,
        error: PortalError,
    },
    /// A newer request was issued after this one; drop the result
    Stale { generation: Generation },
    /// The task ended without a result (panicked); keep the slice
    Lost,
}

struct Completion<T> {
    generation: Generation,
    result: RemoteResult<T>,
}

/// Issues requests for one state slice and classifies their completions
pub struct QuerySynchronizer<T> {
    slice: &'static str,
    latest: Generation,
    latest_settled: bool,
    committed: Option<Generation>,
    tasks: JoinSet<Completion<T>>,
    closed: bool,
}

impl<T: Send + 'static> QuerySynchronizer<T> {
    pub fn new(slice: &'static str) -> Self {
        Self {
            slice,
            latest: Generation::default(),
            latest_settled: true,
            committed: None,
            tasks: JoinSet::new(),
            closed: false,
        }
    }

    /// Start a request without waiting for it
    ///
    /// Returns the generation the request was tagged with. After
    /// [`close`](Self::close) nothing is spawned and the current generation is
    /// returned unchanged.
    pub fn issue<F>(&mut self, request: F) -> Generation
    where
        F: Future<Output = RemoteResult<T>> + Send + 'static,
    {
        if self.closed {
            tracing::debug!(slice = self.slice, "Synchronizer closed, request not issued");
            return self.latest;
        }

        self.latest = self.latest.next();
        self.latest_settled = false;

        let generation = self.latest;
        self.tasks.spawn(async move {
            Completion {
                generation,
                result: request.await,
            }
        });

        tracing::debug!(
            slice = self.slice,
            generation = generation.value(),
            in_flight = self.tasks.len(),
            "Request issued"
        );

        generation
    }

    /// Wait for the next completion, in arrival order
    ///
    /// Returns `None` when nothing is in flight or the synchronizer is closed.
    pub async fn next(&mut self) -> Option<Outcome<T>> {
        if self.closed {
            return None;
        }

        let joined = self.tasks.join_next().await?;
        let outcome = match joined {
            Ok(completion) if completion.generation != self.latest => Outcome::Stale {
                generation: completion.generation,
            },
            Ok(Completion {
                generation,
                result: Ok(value),
            }) => {
                self.latest_settled = true;
                self.committed = Some(generation);
                Outcome::Fresh { generation, value }
            }
            Ok(Completion {
                generation,
                result: Err(error),
            }) => {
                self.latest_settled = true;
                Outcome::Failed { generation, error }
            }
            Err(err) => {
                tracing::warn!(slice = self.slice, "Request task ended without a result: {}", err);
                Outcome::Lost
            }
        };

        Some(outcome)
    }

    /// Invalidate every request in flight without issuing a new one
    ///
    /// Their completions still arrive but are reported as [`Outcome::Stale`].
    /// Used when the slice is cleared locally, e.g. a closed detail view.
    pub fn supersede(&mut self) -> Generation {
        if self.closed {
            return self.latest;
        }
        self.latest = self.latest.next();
        self.latest_settled = true;
        tracing::debug!(
            slice = self.slice,
            generation = self.latest.value(),
            in_flight = self.tasks.len(),
            "Requests superseded"
        );
        self.latest
    }

    /// Abandon everything in flight; later completions are never reported
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.tasks.abort_all();
        self.tasks = JoinSet::new();
        tracing::debug!(slice = self.slice, "Synchronizer closed");
    }
}

impl<T> QuerySynchronizer<T> {
    pub fn slice(&self) -> &'static str {
        self.slice
    }

    /// Generation of the most recently issued request
    pub fn latest(&self) -> Generation {
        self.latest
    }

    /// Generation of the last response that was committed
    pub fn committed(&self) -> Option<Generation> {
        self.committed
    }

    /// Requests still running, superseded ones included
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the latest request is still outstanding
    pub fn is_loading(&self) -> bool {
        !self.closed && !self.latest_settled && !self.tasks.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T> fmt::Debug for QuerySynchronizer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySynchronizer")
            .field("slice", &self.slice)
            .field("latest", &self.latest)
            .field("committed", &self.committed)
            .field("pending", &self.tasks.len())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    fn gated(rx: oneshot::Receiver<RemoteResult<u32>>) -> impl Future<Output = RemoteResult<u32>> {
        async move {
            rx.await.unwrap_or_else(|_| Err(PortalError::Internal("gate dropped".to_string())))
        }
    }

    #[tokio::test]
    async fn test_single_request_is_fresh() {
        let mut sync = QuerySynchronizer::new("numbers");
        let generation = sync.issue(async { Ok(7u32) });

        assert_eq!(generation.value(), 1);
        assert!(sync.is_loading());

        match sync.next().await {
            Some(Outcome::Fresh { generation: g, value }) => {
                assert_eq!(g, generation);
                assert_eq!(value, 7);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!sync.is_loading());
        assert_eq!(sync.committed(), Some(generation));
        assert!(sync.next().await.is_none());
    }

    #[tokio::test]
    async fn test_late_response_of_superseded_request_is_stale() {
        let mut sync = QuerySynchronizer::new("numbers");
        let (tx_old, rx_old) = oneshot::channel();
        let (tx_new, rx_new) = oneshot::channel();

        let old = sync.issue(gated(rx_old));
        let new = sync.issue(gated(rx_new));
        assert_eq!(sync.pending(), 2);

        tx_new.send(Ok(2)).unwrap();
        match sync.next().await {
            Some(Outcome::Fresh { generation, value }) => {
                assert_eq!(generation, new);
                assert_eq!(value, 2);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        tx_old.send(Ok(1)).unwrap();
        match sync.next().await {
            Some(Outcome::Stale { generation }) => assert_eq!(generation, old),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sync.committed(), Some(new));
    }

    #[tokio::test]
    async fn test_supersede_turns_pending_request_stale() {
        let mut sync = QuerySynchronizer::new("numbers");
        let (tx, rx) = oneshot::channel();
        let issued = sync.issue(gated(rx));

        let cleared = sync.supersede();
        assert!(cleared > issued);
        assert!(!sync.is_loading());
        assert_eq!(sync.pending(), 1);

        tx.send(Ok(9)).unwrap();
        match sync.next().await {
            Some(Outcome::Stale { generation }) => assert_eq!(generation, issued),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sync.committed(), None);

        // a request issued afterwards commits normally
        let again = sync.issue(async { Ok(3u32) });
        assert!(matches!(
            sync.next().await,
            Some(Outcome::Fresh { generation, value: 3 }) if generation == again
        ));
    }

    #[tokio::test]
    async fn test_failure_of_latest_is_reported() {
        let mut sync: QuerySynchronizer<u32> = QuerySynchronizer::new("numbers");
        sync.issue(async {
            Err(PortalError::Status {
                status: 502,
                endpoint: "/x".to_string(),
            })
        });

        match sync.next().await {
            Some(Outcome::Failed { error, .. }) => assert_eq!(error.error_code(), "STATUS_ERROR"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(sync.committed(), None);
    }

    #[tokio::test]
    async fn test_close_suppresses_completions() {
        let mut sync = QuerySynchronizer::new("numbers");
        let (mut tx, rx) = oneshot::channel();
        sync.issue(gated(rx));

        sync.close();
        // aborting the task drops its end of the gate
        timeout(Duration::from_secs(1), tx.closed()).await.unwrap();
        assert!(tx.send(Ok(1)).is_err());
        assert!(sync.next().await.is_none());
        assert_eq!(sync.pending(), 0);
        assert!(!sync.is_loading());
    }

    #[tokio::test]
    async fn test_issue_after_close_is_ignored() {
        let mut sync = QuerySynchronizer::new("numbers");
        sync.close();
        let generation = sync.issue(async { Ok(1u32) });

        assert_eq!(generation, Generation::default());
        assert_eq!(sync.pending(), 0);
        assert!(sync.is_closed());
    }

    #[tokio::test]
    async fn test_panicking_task_is_lost() {
        let mut sync: QuerySynchronizer<u32> = QuerySynchronizer::new("numbers");
        sync.issue(async { panic!("boom") });

        assert!(matches!(sync.next().await, Some(Outcome::Lost)));
        assert_eq!(sync.pending(), 0);
    }

    #[test]
    fn test_generation_display() {
        assert_eq!(Generation(4).to_string(), "#4");
        assert!(Generation(2) > Generation(1));
    }
}
