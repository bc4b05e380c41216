pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::env::{Environment, ListenerGuard, TimerHandle};
pub use crate::error::{Error, Result};
pub use crate::geometry::{Rect, Vec2};
pub use crate::input::{
    EventKind, InputEvent, Key, KeyEvent, Modifiers, PointerButton, PointerEvent,
};
pub use crate::locals::{local, provide, require_local};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, Subscription, signal};
pub use crate::surface::{Projection, RegionId, Stage, Surface, detached_region};
pub use crate::tree::NodeId;
pub use crate::view::{Action, Role, View, ViewKind};
