//! Modal dialog rendered through a detached surface.

use vigil_core::{Button, Column, Role, Surface, Text, View};

use crate::overlay::OverlayCoordinator;

pub const MODAL_REGION: &str = "modal-root";

pub fn modal_surface() -> Surface {
    Surface::detached(MODAL_REGION)
}

/// Button that flips the modal.
#[allow(non_snake_case)]
pub fn ModalToggle(overlay: &OverlayCoordinator, label: impl Into<String>) -> View {
    let overlay = overlay.clone();
    Button(label, move || overlay.toggle()).class("modal-toggle")
}

#[allow(non_snake_case)]
pub fn Modal(
    overlay: &OverlayCoordinator,
    title: impl Into<String>,
    body: impl Into<String>,
) -> Option<View> {
    if !overlay.is_open() {
        return None;
    }
    let close = overlay.clone();
    Some(
        vigil_core::Box()
            .class("modal-backdrop")
            .role(Role::Dialog)
            .child(
                Column()
                    .class("modal")
                    .child(Text(title).class("modal-title"))
                    .child(Text(body))
                    .child(Button("Close", move || close.close()).class("modal-close")),
            ),
    )
}
