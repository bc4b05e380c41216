//! Coordinators for transient UI state, and the consumers that render them.
//!
//! - [`OverlayCoordinator`]: open/closed flag closed by the dismiss key or an
//!   outside press. Backs [`Dropdown`] and [`Modal`].
//! - [`NotificationQueue`]: ordered toasts that expire on their own.
//! - [`TabsCoordinator`]: the active tab.
//!
//! Coordinators are reached by consumers through `provide` frames rather than
//! globals, and each one releases its listeners and timers on `unmount` (or
//! when the [`vigil_core::Scope`] it was mounted in is disposed).

pub mod bridge;
pub mod config;
pub mod dropdown;
pub mod modal;
pub mod overlay;
pub mod tabs;
pub mod toast;

pub use bridge::EventBridge;
pub use config::{DEFAULT_TOAST_DURATION, OverlayConfig, ToastConfig};
pub use dropdown::{Dropdown, DropdownItem, DropdownMenu, DropdownTrigger, OnSelect};
pub use modal::{MODAL_REGION, Modal, ModalToggle, modal_surface};
pub use overlay::OverlayCoordinator;
pub use tabs::{Tab, TabPanels, Tabs, TabsCoordinator};
pub use toast::{
    Notification, NotificationId, NotificationQueue, Severity, TOAST_REGION, Toast, ToastHandle,
    ToastList, ToastProvider, toast_surface, use_toast,
};
