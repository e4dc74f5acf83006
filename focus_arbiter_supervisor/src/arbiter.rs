//! Thread-safe focus arbiter.
//!
//! This is the outside-world facing engine around `focus_arbiter_core`:
//! - owns the `ArbitrationQueue` behind one mutex
//! - validates requests before touching the queue
//! - delivers each call's notifications after the lock is released
//!
//! No IO. No async. No threads are spawned; every call runs its own listeners
//! on the calling thread before it returns.

use std::sync::{Mutex, MutexGuard, PoisonError};

use focus_arbiter_core::{
    ArbitrationQueue, FocusCfg, FocusGrant, FocusRequest, FocusResult, Outbox, StreamDescriptor, StreamId,
};

use crate::dispatch::Dispatcher;

/// Read-only view of the queue, front first.
///
/// Pure data for diagnostics; nothing in this crate persists it.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueueSnapshot {
    pub streams: Vec<StreamDescriptor>,
}

impl QueueSnapshot {
    /// The stream holding focus, if any.
    pub fn front(&self) -> Option<StreamDescriptor> {
        self.streams.first().copied()
    }

    pub fn position(&self, id: StreamId) -> Option<usize> {
        self.streams.iter().position(|s| s.id == id)
    }
}

/// Arbitrates exclusive focus between competing streams.
///
/// Construct one per shared output and pass it by reference (or `Arc`) to
/// every producer. Calls deliver in mutation order, so a call may wait for
/// an earlier call's listeners to finish. Listeners may call back into the
/// arbiter from their callbacks; those notifications are delivered after the
/// current one. A listener must not block on another thread's arbiter call.
pub struct FocusArbiter {
    queue: Mutex<ArbitrationQueue>,
    dispatcher: Dispatcher,
}

impl Default for FocusArbiter {
    fn default() -> Self {
        Self::new(FocusCfg::default())
    }
}

impl FocusArbiter {
    pub fn new(cfg: FocusCfg) -> Self {
        Self {
            queue: Mutex::new(ArbitrationQueue::new(cfg)),
            dispatcher: Dispatcher::default(),
        }
    }

    // The queue is consistent between calls (listeners never run under this
    // lock), so a poisoned guard is still safe to use.
    fn lock(&self) -> MutexGuard<'_, ArbitrationQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cfg(&self) -> FocusCfg {
        *self.lock().cfg()
    }

    pub fn request_focus(&self, request: &FocusRequest) -> FocusResult<FocusGrant> {
        self.request_focus_with(request, false)
    }

    pub fn request_focus_transient(&self, request: &FocusRequest) -> FocusResult<FocusGrant> {
        self.request_focus_with(request, true)
    }

    /// Admit `request`, notifying the preempted front and the new front when
    /// focus changes hands. `transient` picks the `*Transient` variants.
    pub fn request_focus_with(&self, request: &FocusRequest, transient: bool) -> FocusResult<FocusGrant> {
        let listener = request.validate().map_err(|e| {
            tracing::warn!(stream = %request.id(), error = %e, "focus request rejected");
            e
        })?;

        let mut outbox = Outbox::new();
        let (grant, ticket) = {
            let mut queue = self.lock();
            let grant = queue.admit(request.stream, listener.clone(), transient, &mut outbox);
            (grant, self.dispatcher.ticket())
        };

        self.dispatcher.deliver(ticket, outbox);
        Ok(grant)
    }

    /// Give up focus (or a pending claim) for `request`'s stream.
    pub fn abandon_focus(&self, request: &FocusRequest) -> FocusResult<()> {
        request.validate().map_err(|e| {
            tracing::warn!(stream = %request.id(), error = %e, "focus abandon rejected");
            e
        })?;
        self.abandon_stream(request.id());
        Ok(())
    }

    /// Release by id. Unknown ids are a no-op.
    pub fn abandon_stream(&self, id: StreamId) {
        let mut outbox = Outbox::new();
        let ticket = {
            let mut queue = self.lock();
            queue.release(id, &mut outbox);
            self.dispatcher.ticket()
        };

        self.dispatcher.deliver(ticket, outbox);
    }

    /// Descriptor of the stream holding focus, or the configured baseline.
    pub fn current_stream(&self) -> StreamDescriptor {
        self.lock().current()
    }

    pub fn contains(&self, id: StreamId) -> bool {
        self.lock().contains(id)
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            streams: self.lock().streams(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl std::fmt::Debug for FocusArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusArbiter")
            .field("queue", &*self.lock())
            .finish_non_exhaustive()
    }
}
