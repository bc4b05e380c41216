use std::time::Duration;

use vigil_core::Key;

/// How an overlay reacts to ambient input.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    /// Key that dismisses the overlay while it is mounted.
    pub dismiss_key: Key,
    pub close_on_escape: bool,
    /// Close when a pointer press lands outside the overlay's region.
    pub close_on_outside_press: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            dismiss_key: Key::Escape,
            close_on_escape: true,
            close_on_outside_press: true,
        }
    }
}

impl OverlayConfig {
    pub fn with_dismiss_key(mut self, key: Key) -> Self {
        self.dismiss_key = key;
        self
    }

    pub fn with_close_on_escape(mut self, on: bool) -> Self {
        self.close_on_escape = on;
        self
    }

    pub fn with_close_on_outside_press(mut self, on: bool) -> Self {
        self.close_on_outside_press = on;
        self
    }
}

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToastConfig {
    /// Time from enqueue to automatic dismissal.
    pub duration: Duration,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_TOAST_DURATION,
        }
    }
}

impl ToastConfig {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}
