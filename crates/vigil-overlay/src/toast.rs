//! # Notification queue
//!
//! Toasts are enqueued from anywhere inside a [`ToastProvider`], shown in
//! insertion order through a detached surface, and dismissed either
//! explicitly or by their expiry timer, whichever comes first. The other one
//! then finds nothing to remove and does nothing.
//!
//! ```rust
//! use std::time::Duration;
//! use vigil_core::*;
//! use vigil_overlay::*;
//!
//! let (env, clock) = Environment::manual();
//! let toasts = NotificationQueue::mount(&env, ToastConfig::default());
//!
//! let id = toasts.enqueue("Saved", Severity::Success).unwrap();
//! assert_eq!(toasts.list()[0].id(), id);
//!
//! clock.advance(Duration::from_millis(3000));
//! env.pump();
//! assert!(toasts.is_empty());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use vigil_core::{
    Column, Environment, Error, Result, Role, Signal, Subscription, Surface, Text, TimerHandle, View,
    effect, on_unmount, require_local, signal,
};
use web_time::Instant;

use crate::config::ToastConfig;

pub const TOAST_REGION: &str = "toast-root";

pub fn toast_surface() -> Surface {
    Surface::detached(TOAST_REGION)
}

/// Unique within the queue that issued it; never reused while it lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Parses a free-form label. Anything unrecognised is `Info`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "success" => Severity::Success,
            "warning" | "warn" => Severity::Warning,
            "error" => Severity::Error,
            "info" => Severity::Info,
            other => {
                log::debug!("toast: unknown severity {other:?}, using info");
                Severity::Info
            }
        }
    }

    /// Styling hook for the rendered message.
    pub fn class(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    id: NotificationId,
    message: String,
    severity: Severity,
    created_at: Instant,
    expires_at: Instant,
}

impl Notification {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

struct QueueInner {
    env: Environment,
    config: ToastConfig,
    entries: RefCell<Vec<Notification>>,
    timers: RefCell<HashMap<NotificationId, TimerHandle>>,
    next_id: Cell<u64>,
    version: Signal<u64>,
    mounted: Cell<bool>,
}

#[derive(Clone)]
pub struct NotificationQueue {
    inner: Rc<QueueInner>,
}

impl NotificationQueue {
    /// If a [`vigil_core::Scope`] is current, disposing it unmounts the queue.
    pub fn mount(env: &Environment, config: ToastConfig) -> Self {
        let inner = Rc::new(QueueInner {
            env: env.clone(),
            config,
            entries: RefCell::new(Vec::new()),
            timers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            version: signal(0),
            mounted: Cell::new(true),
        });

        let weak = Rc::downgrade(&inner);
        effect(move || {
            on_unmount(move || {
                if let Some(this) = Self::upgrade(&weak) {
                    this.unmount();
                }
            })
        });

        log::debug!("toast: queue mounted");
        Self { inner }
    }

    fn upgrade(weak: &Weak<QueueInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn bump(&self) {
        self.inner.version.update(|v| *v = v.wrapping_add(1));
    }

    /// Appends a notification and arms its expiry timer. Fails with
    /// [`Error::Unmounted`] once the queue is unmounted.
    pub fn enqueue(&self, message: impl Into<String>, severity: Severity) -> Result<NotificationId> {
        if !self.inner.mounted.get() {
            log::warn!("toast: enqueue after unmount");
            return Err(Error::Unmounted {
                coordinator: "NotificationQueue",
            });
        }
        let id = NotificationId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let now = self.inner.env.now();
        let duration = self.inner.config.duration;
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: now,
            expires_at: now + duration,
        };
        log::debug!(
            "toast: enqueue {id} ({:?}) {:?}",
            severity,
            notification.message
        );
        self.inner.entries.borrow_mut().push(notification);

        let weak = Rc::downgrade(&self.inner);
        let timer = self.inner.env.set_timeout(duration, move || {
            if let Some(this) = Self::upgrade(&weak) {
                log::debug!("toast: {id} expired");
                this.dismiss(id);
            }
        });
        self.inner.timers.borrow_mut().insert(id, timer);

        self.bump();
        Ok(id)
    }

    /// Same as [`enqueue`](Self::enqueue) with a free-form severity label.
    pub fn enqueue_labeled(
        &self,
        message: impl Into<String>,
        label: &str,
    ) -> Result<NotificationId> {
        self.enqueue(message, Severity::from_label(label))
    }

    /// Enqueues with the default severity.
    pub fn info(&self, message: impl Into<String>) -> Result<NotificationId> {
        self.enqueue(message, Severity::default())
    }

    /// Removes `id` if it is still queued. Returns whether anything was
    /// removed; an absent id is not an error.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut entries = self.inner.entries.borrow_mut();
            match entries.iter().position(|n| n.id == id) {
                Some(pos) => {
                    entries.remove(pos);
                    true
                }
                None => false,
            }
        };
        // Cancels the timer on explicit dismiss; a no-op when it is the
        // timer that brought us here.
        let timer = self.inner.timers.borrow_mut().remove(&id);
        drop(timer);

        if removed {
            log::debug!("toast: dismissed {id}");
            self.bump();
        } else {
            log::trace!("toast: dismiss {id} ignored, not queued");
        }
        removed
    }

    /// Dismisses everything currently queued.
    pub fn clear(&self) {
        let had = !self.inner.entries.borrow().is_empty();
        self.inner.entries.borrow_mut().clear();
        let timers = std::mem::take(&mut *self.inner.timers.borrow_mut());
        drop(timers);
        if had {
            self.bump();
        }
    }

    /// Active notifications, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.inner.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// Called after every change to the list.
    pub fn subscribe(&self, f: impl Fn() + 'static) -> Subscription {
        self.inner.version.subscribe(move |_| f())
    }

    /// Cancels every pending expiry and drops all entries. Later calls are
    /// no-ops.
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }
        let timers = std::mem::take(&mut *self.inner.timers.borrow_mut());
        let cancelled = timers.len();
        drop(timers);
        self.inner.entries.borrow_mut().clear();
        log::debug!("toast: queue unmounted, {cancelled} timer(s) cancelled");
    }
}

/// The enqueue side of a queue, as handed to consumers.
#[derive(Clone)]
pub struct ToastHandle {
    queue: NotificationQueue,
}

impl ToastHandle {
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> Result<NotificationId> {
        self.queue.enqueue(message, severity)
    }

    pub fn show_labeled(&self, message: impl Into<String>, label: &str) -> Result<NotificationId> {
        self.queue.enqueue_labeled(message, label)
    }

    pub fn info(&self, message: impl Into<String>) -> Result<NotificationId> {
        self.queue.info(message)
    }

    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.queue.dismiss(id)
    }
}

pub struct ToastProvider;

impl ToastProvider {
    pub fn provide<R>(queue: &NotificationQueue, content: impl FnOnce() -> R) -> R {
        vigil_core::provide(
            ToastHandle {
                queue: queue.clone(),
            },
            content,
        )
    }
}

/// Enqueue access for consumers. Fails outside a [`ToastProvider`].
pub fn use_toast() -> Result<ToastHandle> {
    require_local::<ToastHandle>("use_toast", "ToastProvider")
}

#[allow(non_snake_case)]
pub fn Toast(notification: &Notification) -> View {
    Text(notification.message())
        .class(format!("toast-message {}", notification.severity().class()))
        .role(Role::Status)
}

#[allow(non_snake_case)]
pub fn ToastList(queue: &NotificationQueue) -> View {
    Column()
        .class("toast")
        .with_children(queue.list().iter().map(Toast).collect())
}
