pub mod stream;
pub mod event;
pub mod listener;
pub mod request;

pub mod precedence;
pub mod holder;
pub mod queue;
pub mod cfg;
pub mod error;

pub use stream::{StreamId, PolicyTier, StreamDescriptor};
pub use event::{FocusChange, FocusGrant};
pub use listener::{FocusChangeListener, SharedListener};
pub use request::FocusRequest;

pub use precedence::outranks;
pub use holder::FocusHolder;
pub use queue::{ArbitrationQueue, Notification, Outbox};
pub use cfg::FocusCfg;
pub use error::{FocusError, FocusResult};
