//! # Overlay coordinator
//!
//! One open/closed flag per mounted overlay, plus the bridge that closes it
//! on the dismiss key or on a press outside its region.
//!
//! ```rust
//! use vigil_core::*;
//! use vigil_overlay::*;
//!
//! let (env, _clock) = Environment::manual();
//! let stage = Stage::new();
//! let menu = OverlayCoordinator::mount(&env, &stage, None, OverlayConfig::default());
//!
//! menu.open();
//! env.dispatch(KeyEvent::new(Key::Escape));
//! assert!(!menu.is_open());
//! ```
//!
//! Every transition is synchronous: the new state is visible to the next call
//! as soon as the current one returns.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use vigil_core::{
    Environment, NodeId, Signal, Stage, Subscription, effect, on_unmount, signal,
};

use crate::bridge::EventBridge;
use crate::config::OverlayConfig;

struct OverlayInner {
    open: Signal<bool>,
    region: NodeId,
    stage: Stage,
    bridge: RefCell<Option<EventBridge>>,
    mounted: Cell<bool>,
}

impl Drop for OverlayInner {
    fn drop(&mut self) {
        if self.mounted.get() {
            self.stage.remove_node(self.region);
        }
    }
}

#[derive(Clone)]
pub struct OverlayCoordinator {
    inner: Rc<OverlayInner>,
}

impl OverlayCoordinator {
    /// Mounts a closed overlay whose region sits under `parent` in the
    /// stage's logical tree.
    ///
    /// If a [`vigil_core::Scope`] is current, disposing it unmounts the
    /// overlay.
    pub fn mount(
        env: &Environment,
        stage: &Stage,
        parent: Option<NodeId>,
        config: OverlayConfig,
    ) -> Self {
        let region = stage.alloc_node(parent);
        let inner = Rc::new(OverlayInner {
            open: signal(false),
            region,
            stage: stage.clone(),
            bridge: RefCell::new(None),
            mounted: Cell::new(true),
        });

        let weak = Rc::downgrade(&inner);
        let close: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(this) = Self::upgrade(&weak) {
                this.close();
            }
        });
        *inner.bridge.borrow_mut() = Some(EventBridge::attach(env, stage, region, config, close));

        let weak = Rc::downgrade(&inner);
        effect(move || {
            on_unmount(move || {
                if let Some(this) = Self::upgrade(&weak) {
                    this.unmount();
                }
            })
        });

        log::debug!("overlay: mounted at {region}");
        Self { inner }
    }

    fn upgrade(weak: &Weak<OverlayInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn open(&self) {
        self.set_open(true);
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    pub fn toggle(&self) {
        self.set_open(!self.is_open());
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Node whose logical descendants count as inside the overlay.
    pub fn region(&self) -> NodeId {
        self.inner.region
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// Whether the outside-press listener is currently registered.
    pub fn is_watching_outside_press(&self) -> bool {
        self.inner
            .bridge
            .borrow()
            .as_ref()
            .is_some_and(EventBridge::is_pointer_active)
    }

    /// Called with the new state after every actual transition.
    pub fn subscribe(&self, f: impl Fn(bool) + 'static) -> Subscription {
        self.inner.open.subscribe(move |open| f(*open))
    }

    fn set_open(&self, open: bool) {
        if !self.inner.mounted.get() {
            log::warn!("overlay {}: set_open({open}) after unmount; ignored", self.inner.region);
            return;
        }
        if self.inner.open.get() == open {
            return;
        }

        // Listener first, so subscribers already see the bridge in its new
        // state and may re-enter freely.
        if let Some(bridge) = self.inner.bridge.borrow_mut().as_mut() {
            bridge.set_pointer_active(open);
        }
        log::debug!(
            "overlay {}: {}",
            self.inner.region,
            if open { "open" } else { "closed" }
        );
        self.inner.open.set(open);
    }

    /// Releases every listener and the region node. Later calls and events
    /// are no-ops. Safe to call more than once.
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }
        let bridge = self.inner.bridge.borrow_mut().take();
        drop(bridge);
        self.inner.stage.remove_node(self.inner.region);
        log::debug!("overlay {}: unmounted", self.inner.region);
    }
}
