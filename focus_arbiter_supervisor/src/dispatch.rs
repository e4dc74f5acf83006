//! Ordered notification delivery outside the queue lock.
//!
//! Every mutation takes a ticket while it still holds the queue lock, so
//! ticket order is mutation order. After unlocking, the caller waits for its
//! turn and delivers its own outbox on its own thread before returning.
//!
//! A listener that re-enters the same arbiter from inside its callback would
//! wait forever on the turn its own thread is serving. Such calls get a
//! `Nested` ticket instead and their notifications are appended to the
//! delivery already running on this thread.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use focus_arbiter_core::{Notification, Outbox};

thread_local! {
    static DELIVERING: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// One delivery running on this thread.
struct Frame {
    dispatcher: usize,
    nested: Outbox,
}

/// Place in the delivery order, taken under the queue lock.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ticket {
    Turn(u64),
    Nested,
}

#[derive(Default)]
struct Turns {
    next: u64,
    serving: u64,
}

#[derive(Default)]
pub(crate) struct Dispatcher {
    turns: Mutex<Turns>,
    advanced: Condvar,
}

impl Dispatcher {
    fn key(&self) -> usize {
        self as *const Self as usize
    }

    fn lock(&self) -> MutexGuard<'_, Turns> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivering_here(&self) -> bool {
        let key = self.key();
        DELIVERING.with(|stack| stack.borrow().iter().any(|f| f.dispatcher == key))
    }

    /// Reserve the next place in the delivery order. Call with the queue
    /// lock held.
    pub(crate) fn ticket(&self) -> Ticket {
        if self.delivering_here() {
            return Ticket::Nested;
        }
        let mut turns = self.lock();
        let ticket = turns.next;
        turns.next += 1;
        Ticket::Turn(ticket)
    }

    /// Deliver `outbox` once every earlier ticket is done. Call without the
    /// queue lock.
    ///
    /// A `Turn` ticket must always be delivered, even with an empty outbox,
    /// or later tickets never get served.
    pub(crate) fn deliver(&self, ticket: Ticket, outbox: Outbox) {
        match ticket {
            Ticket::Nested => {
                let key = self.key();
                let leftover = DELIVERING.with(|stack| {
                    match stack.borrow_mut().iter_mut().rev().find(|f| f.dispatcher == key) {
                        Some(frame) => {
                            frame.nested.extend(outbox);
                            None
                        }
                        None => Some(outbox),
                    }
                });
                if let Some(outbox) = leftover {
                    self.run(outbox);
                }
            }
            Ticket::Turn(ticket) => {
                self.wait_for(ticket);
                let _advance = Advance(self);
                self.run(outbox);
            }
        }
    }

    fn wait_for(&self, ticket: u64) {
        let mut turns = self.lock();
        while turns.serving != ticket {
            turns = self.advanced.wait(turns).unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn run(&self, outbox: Outbox) {
        let _frame = FrameGuard::push(self.key());
        let mut pending: VecDeque<Notification> = outbox.into();

        while let Some(next) = pending.pop_front() {
            if panic::catch_unwind(AssertUnwindSafe(|| next.deliver())).is_err() {
                tracing::error!(
                    stream = %next.stream,
                    change = ?next.change,
                    "focus listener panicked; continuing delivery"
                );
            }
            pending.extend(FrameGuard::take_nested());
        }
    }
}

/// Hands the turn to the next ticket, also when unwinding.
struct Advance<'a>(&'a Dispatcher);

impl Drop for Advance<'_> {
    fn drop(&mut self) {
        self.0.lock().serving += 1;
        self.0.advanced.notify_all();
    }
}

struct FrameGuard;

impl FrameGuard {
    fn push(dispatcher: usize) -> Self {
        DELIVERING.with(|stack| {
            stack.borrow_mut().push(Frame {
                dispatcher,
                nested: Outbox::new(),
            })
        });
        FrameGuard
    }

    /// Notifications queued by re-entrant calls since the last take.
    fn take_nested() -> Outbox {
        DELIVERING.with(|stack| {
            stack
                .borrow_mut()
                .last_mut()
                .map(|f| std::mem::take(&mut f.nested))
                .unwrap_or_default()
        })
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        DELIVERING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use focus_arbiter_core::{
        ArbitrationQueue, FocusCfg, FocusChange, PolicyTier, SharedListener, StreamDescriptor, StreamId,
    };

    use super::*;
    use crate::adapter::FnListener;

    type Log = Arc<Mutex<Vec<(u64, FocusChange)>>>;

    fn recorder(id: u64, log: &Log) -> SharedListener {
        let log = log.clone();
        Arc::new(FnListener::new(move |c| log.lock().unwrap().push((id, c))))
    }

    #[test]
    fn turns_are_served_in_ticket_order() {
        let d = Arc::new(Dispatcher::default());
        let log = Log::default();
        let mut q = ArbitrationQueue::new(FocusCfg::default());

        let mut first = Outbox::new();
        q.admit(StreamDescriptor::new(1u64, PolicyTier::MEDIA), recorder(1, &log), false, &mut first);
        let t1 = d.ticket();
        let mut second = Outbox::new();
        q.admit(StreamDescriptor::new(2u64, PolicyTier::NOTIFY), recorder(2, &log), false, &mut second);
        let t2 = d.ticket();
        assert_eq!((t1, t2), (Ticket::Turn(0), Ticket::Turn(1)));

        let later = {
            let d = d.clone();
            thread::spawn(move || d.deliver(t2, second))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(log.lock().unwrap().is_empty());
        assert!(!later.is_finished());

        d.deliver(t1, first);
        later.join().unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![(1, FocusChange::Gain), (1, FocusChange::Loss), (2, FocusChange::Gain)]
        );
    }

    #[test]
    fn nested_calls_join_the_running_delivery() {
        let d = Arc::new(Dispatcher::default());
        let log = Log::default();

        let two = recorder(2, &log);
        let inner = d.clone();
        let l1 = log.clone();
        let one: SharedListener = Arc::new(FnListener::new(move |c| {
            l1.lock().unwrap().push((1, c));
            let ticket = inner.ticket();
            assert_eq!(ticket, Ticket::Nested);
            inner.deliver(
                ticket,
                vec![Notification {
                    stream: StreamId(2),
                    change: FocusChange::Gain,
                    listener: two.clone(),
                }],
            );
            l1.lock().unwrap().push((1, FocusChange::Loss));
        }));

        let ticket = d.ticket();
        d.deliver(
            ticket,
            vec![Notification {
                stream: StreamId(1),
                change: FocusChange::Gain,
                listener: one,
            }],
        );

        assert_eq!(
            *log.lock().unwrap(),
            vec![(1, FocusChange::Gain), (1, FocusChange::Loss), (2, FocusChange::Gain)]
        );
        // back outside any delivery
        assert_eq!(d.ticket(), Ticket::Turn(1));
    }

    #[test]
    fn panicking_listener_still_hands_over_the_turn() {
        let d = Dispatcher::default();
        let log = Log::default();
        let bomb: SharedListener = Arc::new(FnListener::new(|_| panic!("listener bug")));

        let t1 = d.ticket();
        let t2 = d.ticket();
        d.deliver(
            t1,
            vec![Notification {
                stream: StreamId(1),
                change: FocusChange::Gain,
                listener: bomb,
            }],
        );
        d.deliver(
            t2,
            vec![Notification {
                stream: StreamId(2),
                change: FocusChange::Gain,
                listener: recorder(2, &log),
            }],
        );
        assert_eq!(*log.lock().unwrap(), vec![(2, FocusChange::Gain)]);
    }

    #[test]
    fn empty_outbox_still_takes_its_turn() {
        let d = Dispatcher::default();
        let t1 = d.ticket();
        let t2 = d.ticket();
        d.deliver(t1, Outbox::new());
        d.deliver(t2, Outbox::new());
        assert_eq!(d.lock().serving, 2);
    }
}
