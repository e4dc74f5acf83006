//! Ordered arbitration queue.
//!
//! Position 0 holds focus; everything behind it is pending, ordered by the
//! precedence each holder had against its neighbours when it was inserted.
//! The queue is plain data: it never calls a listener. Every mutation that
//! should be observed appends `Notification`s to a caller-supplied outbox,
//! in delivery order, so the caller decides when and where to run them.

use std::collections::VecDeque;
use std::fmt;

use crate::cfg::FocusCfg;
use crate::event::{FocusChange, FocusGrant};
use crate::holder::FocusHolder;
use crate::listener::SharedListener;
use crate::stream::{StreamDescriptor, StreamId};

/// A focus change owed to one holder's listener.
#[derive(Clone)]
pub struct Notification {
    pub stream: StreamId,
    pub change: FocusChange,
    pub listener: SharedListener,
}

impl Notification {
    fn to(holder: &FocusHolder, change: FocusChange) -> Self {
        Self {
            stream: holder.id(),
            change,
            listener: holder.listener().clone(),
        }
    }

    /// Run the listener.
    pub fn deliver(&self) {
        self.listener.on_focus_change(self.change);
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("stream", &self.stream)
            .field("change", &self.change)
            .finish_non_exhaustive()
    }
}

pub type Outbox = Vec<Notification>;

#[derive(Debug, Default)]
pub struct ArbitrationQueue {
    cfg: FocusCfg,
    holders: VecDeque<FocusHolder>,
}

impl ArbitrationQueue {
    pub fn new(cfg: FocusCfg) -> Self {
        Self {
            cfg,
            holders: VecDeque::new(),
        }
    }

    pub fn cfg(&self) -> &FocusCfg {
        &self.cfg
    }

    /// Admit (or re-admit) `stream` with its `listener`.
    ///
    /// Returns `Granted` when the stream is, or already was, at the front and
    /// `Delayed` when it was queued behind a stronger holder.
    pub fn admit(
        &mut self,
        stream: StreamDescriptor,
        listener: SharedListener,
        transient: bool,
        outbox: &mut Outbox,
    ) -> FocusGrant {
        let threshold = self.cfg.assistant_threshold;

        if self.holders.is_empty() {
            let holder = FocusHolder::new(stream, listener);
            outbox.push(Notification::to(&holder, FocusChange::gain(transient)));
            self.holders.push_front(holder);
            tracing::debug!(stream = %stream.id, tier = stream.tier.0, "focus granted on empty queue");
            return FocusGrant::Granted;
        }

        if self.holders.front().is_some_and(|f| f.has_same_id(stream.id)) {
            return FocusGrant::Granted;
        }

        // The front has a different id, so any stale entry is pending and
        // leaves without a loss notification.
        self.remove_id(stream.id);

        let holder = FocusHolder::new(stream, listener);

        if let Some(front) = self.holders.front() {
            if holder.outranks(front, threshold) {
                outbox.push(Notification::to(front, FocusChange::loss(transient)));
                tracing::debug!(
                    stream = %stream.id,
                    preempted = %front.id(),
                    transient,
                    "focus preempted"
                );
                outbox.push(Notification::to(&holder, FocusChange::gain(transient)));
                self.holders.push_front(holder);
                return FocusGrant::Granted;
            }
        }

        let slot = self
            .holders
            .iter()
            .skip(1)
            .position(|queued| holder.outranks(queued, threshold))
            .map(|i| i + 1);

        match slot {
            Some(idx) => self.holders.insert(idx, holder),
            None => self.holders.push_back(holder),
        }

        tracing::debug!(stream = %stream.id, position = slot.unwrap_or(self.holders.len() - 1), "focus delayed");
        FocusGrant::Delayed
    }

    /// Drop every holder for `id`.
    ///
    /// Releasing the front promotes the next holder, which gets `Gain`.
    /// Releasing a pending holder is silent. Unknown ids are a no-op.
    pub fn release(&mut self, id: StreamId, outbox: &mut Outbox) {
        let front_matches = self.holders.front().is_some_and(|f| f.has_same_id(id));

        if front_matches {
            self.holders.pop_front();
            if let Some(next) = self.holders.front() {
                outbox.push(Notification::to(next, FocusChange::Gain));
                tracing::debug!(released = %id, promoted = %next.id(), "focus promoted");
            } else {
                tracing::debug!(released = %id, "focus released, queue empty");
            }
        } else {
            let removed = self.remove_id(id);
            if removed > 0 {
                tracing::debug!(released = %id, "pending focus request withdrawn");
            }
        }
    }

    /// Descriptor of the current front, or the configured baseline.
    pub fn current(&self) -> StreamDescriptor {
        self.holders
            .front()
            .map(FocusHolder::stream)
            .unwrap_or(self.cfg.baseline)
    }

    pub fn contains(&self, id: StreamId) -> bool {
        self.holders.iter().any(|h| h.has_same_id(id))
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FocusHolder> {
        self.holders.iter()
    }

    /// Descriptors front to back.
    pub fn streams(&self) -> Vec<StreamDescriptor> {
        self.holders.iter().map(FocusHolder::stream).collect()
    }

    fn remove_id(&mut self, id: StreamId) -> usize {
        let before = self.holders.len();
        self.holders.retain(|h| !h.has_same_id(id));
        before - self.holders.len()
    }
}
