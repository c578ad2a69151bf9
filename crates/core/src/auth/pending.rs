//! Callers waiting on an in-flight refresh

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::errors::RefreshFailure;

/// Result of a refresh cycle: the new token, or why there is none
pub type RefreshOutcome = Result<String, RefreshFailure>;

/// A caller suspended until the in-flight refresh settles
///
/// Holds one continuation for each outcome. Settling consumes the request,
/// so it can only happen once.
pub struct PendingRequest {
    on_success: Box<dyn FnOnce(String) + Send + 'static>,
    on_failure: Box<dyn FnOnce(RefreshFailure) + Send + 'static>,
}

impl PendingRequest {
    pub fn new<S, F>(on_success: S, on_failure: F) -> Self
    where
        S: FnOnce(String) + Send + 'static,
        F: FnOnce(RefreshFailure) + Send + 'static,
    {
        Self { on_success: Box::new(on_success), on_failure: Box::new(on_failure) }
    }

    /// A request that forwards its outcome to a oneshot receiver.
    pub fn channel() -> (Self, oneshot::Receiver<RefreshOutcome>) {
        let (tx, rx) = oneshot::channel();
        let tx = Arc::new(Mutex::new(Some(tx)));
        let on_failure_tx = Arc::clone(&tx);

        let request = Self::new(
            move |token| forward(&tx, Ok(token)),
            move |failure| forward(&on_failure_tx, Err(failure)),
        );
        (request, rx)
    }

    pub fn settle(self, outcome: RefreshOutcome) {
        match outcome {
            Ok(token) => (self.on_success)(token),
            Err(failure) => (self.on_failure)(failure),
        }
    }
}

fn forward(slot: &Mutex<Option<oneshot::Sender<RefreshOutcome>>>, outcome: RefreshOutcome) {
    if let Some(tx) = slot.lock().take() {
        // The waiter may have been cancelled; nothing to deliver to.
        let _ = tx.send(outcome);
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest").finish_non_exhaustive()
    }
}

/// FIFO queue of pending requests
#[derive(Debug, Default)]
pub struct PendingQueue {
    requests: VecDeque<PendingRequest>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: PendingRequest) {
        self.requests.push_back(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Take every queued request, leaving the queue empty.
    pub fn drain(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Settle every request in enqueue order with a copy of `outcome`.
    pub fn settle_all(self, outcome: &RefreshOutcome) {
        for request in self.requests {
            request.settle(outcome.clone());
        }
    }
}
