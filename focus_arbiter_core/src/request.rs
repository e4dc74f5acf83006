use std::fmt;
use std::sync::Arc;

use crate::error::{FocusError, FocusResult};
use crate::listener::{FocusChangeListener, SharedListener};
use crate::stream::{StreamDescriptor, StreamId};

/// A caller's bid for focus: the stream it speaks for and where to send
/// gain/loss notifications.
#[derive(Clone)]
pub struct FocusRequest {
    pub stream: StreamDescriptor,
    pub listener: Option<SharedListener>,
}

impl FocusRequest {
    pub fn new(stream: StreamDescriptor, listener: Arc<dyn FocusChangeListener>) -> Self {
        Self {
            stream,
            listener: Some(listener),
        }
    }

    /// A request with no listener attached. It cannot be admitted.
    pub fn unbound(stream: StreamDescriptor) -> Self {
        Self {
            stream,
            listener: None,
        }
    }

    #[inline]
    pub fn id(&self) -> StreamId {
        self.stream.id
    }

    /// Returns the listener, or `InvalidRequest` when none is attached.
    pub fn validate(&self) -> FocusResult<&SharedListener> {
        self.listener
            .as_ref()
            .ok_or(FocusError::InvalidRequest("no listener attached"))
    }
}

impl fmt::Debug for FocusRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusRequest")
            .field("stream", &self.stream)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
