//! focus_arbiter_supervisor
//!
//! Outside-world facing orchestration layer for `focus_arbiter_core`.
//!
//! Responsibilities:
//! - serialize every queue mutation and read behind one lock
//! - validate incoming requests
//! - deliver gain/loss notifications in mutation order, outside the lock
//! - adapt closures and channels into listeners
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no ordering policy (lives in core)

pub mod adapter;
pub mod arbiter;
mod dispatch;

pub use adapter::{
    FnListener,
    ChannelListener,
    request_from_fn,
    request_with_channel,
};

pub use arbiter::{
    FocusArbiter,
    QueueSnapshot,
};
