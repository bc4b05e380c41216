use std::cell::RefCell;
use std::rc::Rc;

use crate::signal::Subscription;

/// Teardown that runs at most once, however many clones ask for it.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }
}

/// Cancelling the subscription is the teardown.
impl From<Subscription> for Dispose {
    fn from(sub: Subscription) -> Self {
        Dispose::new(move || sub.cancel())
    }
}

/// Runs `setup` now. The teardown it returns is handed to the current
/// [`Scope`](crate::Scope), if any, and returned so it can also be run early.
pub fn effect(setup: impl FnOnce() -> Dispose) -> Dispose {
    let teardown = setup();
    if let Some(scope) = crate::scope::current_scope() {
        let registered = teardown.clone();
        scope.add_disposer(move || registered.run());
    }
    teardown
}

pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}
