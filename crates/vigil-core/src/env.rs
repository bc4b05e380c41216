//! Process-wide input listeners and timers.
//!
//! The `Environment` stands in for the window/document: hosts feed it raw
//! key and pointer presses through [`Environment::dispatch`] and drive timers
//! with [`Environment::pump`]. Coordinators only ever hold guards returned by
//! it, so releasing a coordinator releases everything it registered.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use web_time::Instant;

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::input::{EventKind, InputEvent, KeyEvent, PointerEvent};
use crate::timer::{TimerId, TimerQueue};

new_key_type! {
    pub struct ListenerId;
}

type Handler = Rc<dyn Fn(&InputEvent)>;

struct Listener {
    kind: EventKind,
    handler: Handler,
}

struct EnvInner {
    clock: Rc<dyn Clock>,
    listeners: SlotMap<ListenerId, Listener>,
    timers: TimerQueue,
}

#[derive(Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvInner>>,
}

impl Environment {
    pub fn new(clock: impl Clock) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvInner {
                clock: Rc::new(clock),
                listeners: SlotMap::with_key(),
                timers: TimerQueue::new(),
            })),
        }
    }

    pub fn system() -> Self {
        Self::new(SystemClock)
    }

    /// Environment on a hand-driven clock, for tests and scripted demos.
    pub fn manual() -> (Self, ManualClock) {
        let clock = ManualClock::new();
        (Self::new(clock.clone()), clock)
    }

    pub fn now(&self) -> Instant {
        let clock = self.inner.borrow().clock.clone();
        clock.now()
    }

    pub fn listen(
        &self,
        kind: EventKind,
        handler: impl Fn(&InputEvent) + 'static,
    ) -> ListenerGuard {
        let id = self.inner.borrow_mut().listeners.insert(Listener {
            kind,
            handler: Rc::new(handler),
        });
        log::trace!("env: listener {id:?} added for {kind:?}");
        ListenerGuard {
            id,
            env: Rc::downgrade(&self.inner),
        }
    }

    pub fn on_key(&self, handler: impl Fn(&KeyEvent) + 'static) -> ListenerGuard {
        self.listen(EventKind::KeyDown, move |ev| {
            if let InputEvent::Key(k) = ev {
                handler(k)
            }
        })
    }

    pub fn on_pointer_down(&self, handler: impl Fn(&PointerEvent) + 'static) -> ListenerGuard {
        self.listen(EventKind::PointerDown, move |ev| {
            if let InputEvent::Pointer(p) = ev {
                handler(p)
            }
        })
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Delivers `event` to every listener of its kind, in registration order.
    /// Returns how many handlers ran.
    ///
    /// Handlers may add or remove listeners. One removed mid-dispatch is not
    /// called afterwards.
    pub fn dispatch(&self, event: impl Into<InputEvent>) -> usize {
        let event = event.into();
        let kind = event.kind();
        let snapshot: SmallVec<[(ListenerId, Handler); 4]> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| l.kind == kind)
            .map(|(id, l)| (id, l.handler.clone()))
            .collect();
        log::trace!("env: dispatch {kind:?} to {} listener(s)", snapshot.len());

        let mut ran = 0;
        for (id, handler) in snapshot {
            let alive = self.inner.borrow().listeners.contains_key(id);
            if alive {
                handler(&event);
                ran += 1;
            }
        }
        ran
    }

    pub fn set_timeout(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerHandle {
        let deadline = self.now() + delay;
        let id = self.inner.borrow_mut().timers.schedule(deadline, callback);
        log::trace!("env: timer {id:?} scheduled in {delay:?}");
        TimerHandle {
            id,
            env: Rc::downgrade(&self.inner),
            armed: true,
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.borrow().timers.next_deadline()
    }

    /// Fires every timer due at the current clock reading. Returns how many
    /// fired. Timers scheduled by a callback with a deadline that is already
    /// due fire in the same pump.
    pub fn pump(&self) -> usize {
        let now = self.now();
        let mut fired = 0;
        loop {
            let due = self.inner.borrow_mut().timers.take_due(now);
            let Some((id, callback)) = due else { break };
            log::trace!("env: timer {id:?} fired");
            callback();
            fired += 1;
        }
        fired
    }
}

/// Registration of one listener. Dropping it unregisters.
#[must_use = "dropping a ListenerGuard unregisters the listener immediately"]
pub struct ListenerGuard {
    id: ListenerId,
    env: Weak<RefCell<EnvInner>>,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_registered(&self) -> bool {
        self.env
            .upgrade()
            .is_some_and(|env| env.borrow().listeners.contains_key(self.id))
    }

    pub fn release(self) {}
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(env) = self.env.upgrade() else {
            return;
        };
        // The handler may own guards of its own; release it after the
        // registry borrow ends.
        let removed = env.borrow_mut().listeners.remove(self.id);
        if removed.is_some() {
            log::trace!("env: listener {:?} removed", self.id);
        }
        drop(removed);
    }
}

/// A scheduled one-shot timer. Dropping the handle cancels it unless it was
/// [`detach`](TimerHandle::detach)ed.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    id: TimerId,
    env: Weak<RefCell<EnvInner>>,
    armed: bool,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn is_pending(&self) -> bool {
        self.env
            .upgrade()
            .is_some_and(|env| env.borrow().timers.is_pending(self.id))
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.env
            .upgrade()
            .and_then(|env| env.borrow().timers.deadline(self.id))
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(mut self) -> bool {
        self.armed = false;
        self.unschedule()
    }

    fn unschedule(&self) -> bool {
        let Some(env) = self.env.upgrade() else {
            return false;
        };
        let callback = env.borrow_mut().timers.cancel(self.id);
        let cancelled = callback.is_some();
        drop(callback);
        cancelled
    }

    /// Lets the timer fire even though nobody holds the handle any more.
    pub fn detach(mut self) {
        self.armed = false;
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if self.armed && self.unschedule() {
            log::trace!("env: timer {:?} cancelled", self.id);
        }
    }
}
