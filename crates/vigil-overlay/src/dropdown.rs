//! Dropdown compound component.
//!
//! `Dropdown::provide` publishes the overlay and the selection callback to
//! everything built inside it; `DropdownTrigger`, `DropdownMenu` and
//! `DropdownItem` pick them up from there and hold no state of their own.
//!
//! Selecting an item calls `on_select(&value)` first and closes the menu
//! afterwards. If the callback fails, its error is returned untouched and the
//! menu stays open.

use std::rc::Rc;

use vigil_core::{Column, Result, Role, TryButton, View, require_local};

use crate::overlay::OverlayCoordinator;

pub type OnSelect<V> = Rc<dyn Fn(&V) -> anyhow::Result<()>>;

#[derive(Clone)]
struct DropdownScope {
    overlay: OverlayCoordinator,
}

struct SelectHandler<V: 'static>(OnSelect<V>);

// Only the `Rc` is cloned, so `V` itself need not be `Clone`.
impl<V: 'static> Clone for SelectHandler<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

pub struct Dropdown;

impl Dropdown {
    pub fn provide<V: 'static, R>(
        overlay: &OverlayCoordinator,
        on_select: impl Fn(&V) -> anyhow::Result<()> + 'static,
        content: impl FnOnce() -> R,
    ) -> R {
        let scope = DropdownScope {
            overlay: overlay.clone(),
        };
        let handler = SelectHandler::<V>(Rc::new(on_select));
        vigil_core::provide(scope, || vigil_core::provide(handler, content))
    }

    /// Wraps trigger and menu in the dropdown root. Mount it under
    /// [`OverlayCoordinator::region`] so presses on either count as inside.
    pub fn root(trigger: View, menu: Option<View>) -> View {
        let root = vigil_core::Box().class("dropdown").child(trigger);
        match menu {
            Some(menu) => root.child(menu),
            None => root,
        }
    }
}

fn scope(consumer: &'static str) -> Result<DropdownScope> {
    require_local::<DropdownScope>(consumer, "Dropdown")
}

/// Button that toggles the menu.
#[allow(non_snake_case)]
pub fn DropdownTrigger(label: impl Into<String>) -> Result<View> {
    let overlay = scope("DropdownTrigger")?.overlay;
    Ok(TryButton(label, move || {
        overlay.toggle();
        Ok(())
    })
    .class("dropdown-trigger"))
}

/// The menu while open, nothing while closed.
#[allow(non_snake_case)]
pub fn DropdownMenu(items: Vec<View>) -> Result<Option<View>> {
    let overlay = scope("DropdownMenu")?.overlay;
    if !overlay.is_open() {
        return Ok(None);
    }
    Ok(Some(
        Column()
            .class("dropdown-menu")
            .role(Role::Menu)
            .with_children(items),
    ))
}

#[allow(non_snake_case)]
pub fn DropdownItem<V: Clone + 'static>(value: V, label: impl Into<String>) -> Result<View> {
    let overlay = scope("DropdownItem")?.overlay;
    let on_select = require_local::<SelectHandler<V>>("DropdownItem", "Dropdown")?.0;
    Ok(TryButton(label, move || select(&overlay, &on_select, &value))
        .class("dropdown-item")
        .role(Role::MenuItem))
}

/// Call-then-close. An `Err` from `on_select` leaves the overlay open.
pub fn select<V: 'static>(
    overlay: &OverlayCoordinator,
    on_select: &OnSelect<V>,
    value: &V,
) -> anyhow::Result<()> {
    on_select(value)?;
    overlay.close();
    Ok(())
}
