//! # State, Scopes, and the Environment
//!
//! Vigil coordinates short-lived UI state (a menu that is open, a toast that
//! is waiting to expire) that many decoupled callers mutate and that reacts to
//! ambient input. The core crate holds the pieces every coordinator is built
//! from:
//!
//! - `Signal<T>`: observable value with RAII subscriptions.
//! - `Scope` / `Dispose`: deterministic teardown.
//! - `provide` / `require_local`: scoped context lookup for consumers.
//! - `Environment`: process-wide key and pointer listeners plus timers.
//! - `Stage` / `Surface`: where projected views are mounted.
//!
//! ## Signals
//!
//! ```rust
//! use vigil_core::*;
//!
//! let open = signal(false);
//! let _sub = open.subscribe(|v| log::debug!("open = {v}"));
//! open.set(true);
//! assert!(open.get());
//! ```
//!
//! Dropping the returned `Subscription` unsubscribes.
//!
//! ## Environment
//!
//! Listeners are handed out as guards. Nothing stays registered once the guard
//! is gone:
//!
//! ```rust
//! use vigil_core::*;
//!
//! let (env, clock) = Environment::manual();
//! let guard = env.on_key(|ev| log::debug!("key {:?}", ev.key));
//! assert_eq!(env.listener_count(EventKind::KeyDown), 1);
//! drop(guard);
//! assert_eq!(env.listener_count(EventKind::KeyDown), 0);
//!
//! let timer = env.set_timeout(std::time::Duration::from_millis(10), || {});
//! clock.advance(std::time::Duration::from_millis(10));
//! assert_eq!(env.pump(), 1);
//! assert!(!timer.is_pending());
//! ```
//!
//! ## Scopes
//!
//! Everything mounted while a `Scope` is current registers its teardown with
//! it, so disposing the scope releases listeners and cancels timers:
//!
//! ```rust
//! use vigil_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     scoped_effect(|| Box::new(|| log::debug!("released")));
//! });
//! scope.dispose();
//! ```

pub mod clock;
pub mod effects;
pub mod env;
pub mod error;
pub mod geometry;
pub mod input;
pub mod locals;
pub mod prelude;
pub mod scope;
pub mod signal;
pub mod surface;
pub mod tests;
pub mod timer;
pub mod tree;
pub mod view;

pub use clock::*;
pub use effects::*;
pub use env::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use locals::*;
pub use scope::*;
pub use signal::*;
pub use surface::*;
pub use timer::*;
pub use tree::*;
pub use view::*;
