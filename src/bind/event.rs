//! Bind events and subscriptions
//!
//! Each bind keeps one observer list per [`BindEvent`]. Subscribing returns a
//! [`Subscription`] handle; cancelling it flips a shared flag, so a subscriber
//! may cancel itself (or any other subscription) while a dispatch is running.
//! Cancelled entries are skipped immediately and compacted after the loop.

use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// The three edge signals a bind can raise per tick, in dispatch order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindEvent {
    NewPress,
    PressAndHeld,
    Release,
}

impl BindEvent {
    pub const ALL: [BindEvent; 3] = [
        BindEvent::NewPress,
        BindEvent::PressAndHeld,
        BindEvent::Release,
    ];
}

impl fmt::Display for BindEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindEvent::NewPress => write!(f, "NewPress"),
            BindEvent::PressAndHeld => write!(f, "PressAndHeld"),
            BindEvent::Release => write!(f, "Release"),
        }
    }
}

/// Handle returned by `subscribe`, used to remove the subscriber again
#[derive(Debug, Clone)]
pub struct Subscription {
    event: BindEvent,
    live: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn event(&self) -> BindEvent {
        self.event
    }

    /// Stop the subscriber from being called. Safe to call mid-dispatch.
    pub fn cancel(&self) {
        self.live.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.live.get()
    }
}

struct Subscriber {
    id: u64,
    live: Rc<Cell<bool>>,
    callback: Box<dyn FnMut()>,
}

/// Observer list for a single event
#[derive(Default)]
pub(crate) struct Subscribers {
    entries: Vec<Subscriber>,
    next_id: u64,
}

impl Subscribers {
    pub(crate) fn subscribe(
        &mut self,
        event: BindEvent,
        callback: impl FnMut() + 'static,
    ) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;

        let live = Rc::new(Cell::new(true));
        self.entries.push(Subscriber {
            id,
            live: Rc::clone(&live),
            callback: Box::new(callback),
        });

        Subscription { event, live }
    }

    /// Remove a subscriber. Returns false if it was not in this list.
    pub(crate) fn unsubscribe(&mut self, subscription: &Subscription) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|s| Rc::ptr_eq(&s.live, &subscription.live))
        else {
            return false;
        };

        subscription.cancel();
        self.entries.remove(pos);
        true
    }

    pub(crate) fn clear(&mut self) {
        for entry in &self.entries {
            entry.live.set(false);
        }
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.iter().filter(|s| s.live.get()).count()
    }

    /// Call every live subscriber once, in subscription order.
    ///
    /// A panicking subscriber is logged and skipped; the rest still run.
    pub(crate) fn dispatch(&mut self, bind: &str, event: BindEvent) {
        let mut saw_dead = false;

        for entry in &mut self.entries {
            if !entry.live.get() {
                saw_dead = true;
                continue;
            }

            let callback = &mut entry.callback;
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback())) {
                tracing::error!(
                    bind,
                    %event,
                    subscriber = entry.id,
                    "subscriber panicked: {}",
                    panic_message(&*payload)
                );
            }

            saw_dead |= !entry.live.get();
        }

        if saw_dead {
            self.entries.retain(|s| s.live.get());
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_dispatch_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::default();
        for n in 0..3 {
            let log = Rc::clone(&log);
            subs.subscribe(BindEvent::NewPress, move || log.borrow_mut().push(n));
        }

        subs.dispatch("A", BindEvent::NewPress);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_removes_entry() {
        let count = Rc::new(Cell::new(0));
        let mut subs = Subscribers::default();
        let counter = Rc::clone(&count);
        let handle = subs.subscribe(BindEvent::Release, move || counter.set(counter.get() + 1));

        assert!(subs.unsubscribe(&handle));
        assert!(!subs.unsubscribe(&handle));
        assert!(!handle.is_active());

        subs.dispatch("A", BindEvent::Release);
        assert_eq!(count.get(), 0);
        assert_eq!(subs.len(), 0);
    }

    #[test]
    fn test_cancel_during_dispatch() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::default();

        // The first subscriber cancels the second before it gets to run
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let first_log = Rc::clone(&log);
        let first_slot = Rc::clone(&slot);
        subs.subscribe(BindEvent::NewPress, move || {
            first_log.borrow_mut().push("first");
            if let Some(second) = first_slot.borrow().as_ref() {
                second.cancel();
            }
        });
        let second_log = Rc::clone(&log);
        let second = subs.subscribe(BindEvent::NewPress, move || {
            second_log.borrow_mut().push("second");
        });
        *slot.borrow_mut() = Some(second);

        subs.dispatch("A", BindEvent::NewPress);
        assert_eq!(*log.borrow(), vec!["first"]);
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_panicking_subscriber_is_contained() {
        let count = Rc::new(Cell::new(0));
        let mut subs = Subscribers::default();
        subs.subscribe(BindEvent::NewPress, || panic!("boom"));
        let counter = Rc::clone(&count);
        subs.subscribe(BindEvent::NewPress, move || counter.set(counter.get() + 1));

        subs.dispatch("A", BindEvent::NewPress);
        subs.dispatch("A", BindEvent::NewPress);
        assert_eq!(count.get(), 2);
        // The panicking subscriber stays subscribed
        assert_eq!(subs.len(), 2);
    }

    #[test]
    fn test_clear_deactivates_handles() {
        let mut subs = Subscribers::default();
        let handle = subs.subscribe(BindEvent::PressAndHeld, || {});
        subs.clear();
        assert!(!handle.is_active());
        assert_eq!(subs.len(), 0);
    }
}
