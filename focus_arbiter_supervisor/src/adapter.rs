//! Listener adapters: turn outside-world callbacks into `FocusChangeListener`s.
//!
//! Small and policy-free. Products that already have a callback or a channel
//! for player events can plug it in here instead of writing a listener type.

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use focus_arbiter_core::{FocusChange, FocusChangeListener, FocusRequest, StreamDescriptor, StreamId};

/// Listener backed by a closure.
pub struct FnListener<F> {
    f: F,
}

impl<F> FnListener<F>
where
    F: Fn(FocusChange) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> FocusChangeListener for FnListener<F>
where
    F: Fn(FocusChange) + Send + Sync,
{
    fn on_focus_change(&self, change: FocusChange) {
        (self.f)(change)
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnListener")
    }
}

/// Forwards `(stream, change)` pairs into an mpsc channel.
///
/// A dropped receiver is logged and otherwise ignored.
#[derive(Debug)]
pub struct ChannelListener {
    stream: StreamId,
    tx: Sender<(StreamId, FocusChange)>,
}

impl ChannelListener {
    pub fn new(stream: StreamId, tx: Sender<(StreamId, FocusChange)>) -> Self {
        Self { stream, tx }
    }
}

impl FocusChangeListener for ChannelListener {
    fn on_focus_change(&self, change: FocusChange) {
        if self.tx.send((self.stream, change)).is_err() {
            tracing::warn!(stream = %self.stream, change = ?change, "focus receiver dropped");
        }
    }
}

/// Build a request whose listener is `f`.
pub fn request_from_fn<F>(stream: StreamDescriptor, f: F) -> FocusRequest
where
    F: Fn(FocusChange) + Send + Sync + 'static,
{
    FocusRequest::new(stream, Arc::new(FnListener::new(f)))
}

/// Build a request that reports into `tx`.
pub fn request_with_channel(stream: StreamDescriptor, tx: Sender<(StreamId, FocusChange)>) -> FocusRequest {
    FocusRequest::new(stream, Arc::new(ChannelListener::new(stream.id, tx)))
}
