//! Event bridge: turns ambient key and pointer presses into coordinator
//! calls.
//!
//! The bridge owns the listener guards; it never owns the coordinator. The
//! `close` callback it is given is expected to hold only a weak reference, so
//! an event arriving after teardown has nothing left to mutate.

use std::rc::Rc;

use vigil_core::{Environment, ListenerGuard, NodeId, Stage};

use crate::config::OverlayConfig;

pub struct EventBridge {
    env: Environment,
    stage: Stage,
    region: NodeId,
    config: OverlayConfig,
    close: Rc<dyn Fn()>,
    keyboard: Option<ListenerGuard>,
    pointer: Option<ListenerGuard>,
}

impl EventBridge {
    /// Starts listening for the dismiss key right away. The outside-press
    /// listener waits for [`EventBridge::set_pointer_active`].
    pub fn attach(
        env: &Environment,
        stage: &Stage,
        region: NodeId,
        config: OverlayConfig,
        close: Rc<dyn Fn()>,
    ) -> Self {
        let keyboard = config.close_on_escape.then(|| {
            let close = close.clone();
            let key = config.dismiss_key;
            env.on_key(move |ev| {
                if ev.key == key {
                    log::trace!("bridge: dismiss key {key:?}");
                    close();
                }
            })
        });

        Self {
            env: env.clone(),
            stage: stage.clone(),
            region,
            config,
            close,
            keyboard,
            pointer: None,
        }
    }

    /// Attaches the outside-press listener while `active`, drops it otherwise.
    pub fn set_pointer_active(&mut self, active: bool) {
        if !active {
            if self.pointer.take().is_some() {
                log::trace!("bridge: outside-press listener detached for {}", self.region);
            }
            return;
        }
        if !self.config.close_on_outside_press || self.pointer.is_some() {
            return;
        }

        let close = self.close.clone();
        let stage = self.stage.clone();
        let region = self.region;
        self.pointer = Some(self.env.on_pointer_down(move |ev| {
            let inside = ev.target.is_some_and(|t| stage.contains(region, t));
            if !inside {
                log::trace!("bridge: press outside {region}");
                close();
            }
        }));
        log::trace!("bridge: outside-press listener attached for {}", self.region);
    }

    pub fn is_keyboard_active(&self) -> bool {
        self.keyboard.is_some()
    }

    pub fn is_pointer_active(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn release(&mut self) {
        self.keyboard = None;
        self.pointer = None;
    }
}
