use std::fmt;

use crate::listener::SharedListener;
use crate::precedence::outranks;
use crate::stream::{PolicyTier, StreamDescriptor, StreamId};

/// An admitted request sitting in the arbitration queue.
///
/// The descriptor is copied at admission and never changes afterwards.
#[derive(Clone)]
pub struct FocusHolder {
    stream: StreamDescriptor,
    listener: SharedListener,
}

impl FocusHolder {
    pub fn new(stream: StreamDescriptor, listener: SharedListener) -> Self {
        Self { stream, listener }
    }

    #[inline]
    pub fn stream(&self) -> StreamDescriptor {
        self.stream
    }

    #[inline]
    pub fn id(&self) -> StreamId {
        self.stream.id
    }

    #[inline]
    pub fn has_same_id(&self, id: StreamId) -> bool {
        self.stream.id == id
    }

    pub fn listener(&self) -> &SharedListener {
        &self.listener
    }

    #[inline]
    pub fn outranks(&self, other: &FocusHolder, assistant_threshold: PolicyTier) -> bool {
        outranks(&self.stream, &other.stream, assistant_threshold)
    }
}

impl fmt::Debug for FocusHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusHolder").field("stream", &self.stream).finish_non_exhaustive()
    }
}
