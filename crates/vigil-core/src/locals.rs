//! # Scoped locals
//!
//! Coordinators are handed to their consumers through thread-local frames
//! keyed by type, the same way a subtree can be given a value without
//! threading it through every call:
//!
//! ```rust
//! use vigil_core::*;
//!
//! #[derive(Clone)]
//! struct Accent(&'static str);
//!
//! provide(Accent("indigo"), || {
//!     assert_eq!(local::<Accent>().map(|a| a.0), Some("indigo"));
//! });
//! assert!(local::<Accent>().is_none());
//! ```
//!
//! A frame lives exactly as long as the closure passed to [`provide`], so a
//! value can never leak to callers outside the subtree that provided it.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = const { RefCell::new(Vec::new()) };
}

/// Makes `value` visible to [`local`] for the duration of `f`.
///
/// Nested calls shadow outer values of the same type.
pub fn provide<T: Clone + 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<T>(), Box::new(value));
        f()
    })
}

/// Nearest provided value of type `T`, if any.
pub fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(d) = v.downcast_ref::<T>()
            {
                return Some(d.clone());
            }
        }
        None
    })
}

/// Like [`local`], but a missing value is caller misuse and fails fast.
pub fn require_local<T: Clone + 'static>(
    consumer: &'static str,
    provider: &'static str,
) -> Result<T> {
    local::<T>().ok_or_else(|| {
        log::error!("{consumer} used outside <{provider}>");
        Error::MissingProvider { consumer, provider }
    })
}

pub fn locals_depth() -> usize {
    LOCALS_STACK.with(|st| st.borrow().len())
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        }
    });
}
