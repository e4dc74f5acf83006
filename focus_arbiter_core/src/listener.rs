use std::sync::Arc;

use crate::event::FocusChange;

/// Sink for focus notifications.
///
/// Implementations run on the thread of the call that caused the change,
/// so they must be `Send + Sync`. Listeners may call back into the arbiter
/// from inside `on_focus_change`.
pub trait FocusChangeListener: Send + Sync {
    fn on_focus_change(&self, change: FocusChange);
}

impl<L: FocusChangeListener + ?Sized> FocusChangeListener for Arc<L> {
    fn on_focus_change(&self, change: FocusChange) {
        (**self).on_focus_change(change)
    }
}

impl<L: FocusChangeListener + ?Sized> FocusChangeListener for Box<L> {
    fn on_focus_change(&self, change: FocusChange) {
        (**self).on_focus_change(change)
    }
}

pub type SharedListener = Arc<dyn FocusChangeListener>;
