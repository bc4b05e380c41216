//! Tabs compound component: one active index shared by every tab and the
//! panel switcher.

use vigil_core::{Button, Result, Role, Signal, Subscription, View, require_local, signal};

#[derive(Clone)]
pub struct TabsCoordinator {
    active: Signal<usize>,
}

impl Default for TabsCoordinator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TabsCoordinator {
    pub fn new(initial: usize) -> Self {
        Self {
            active: signal(initial),
        }
    }

    pub fn select(&self, index: usize) {
        if self.active.set_if_changed(index) {
            log::debug!("tabs: selected {index}");
        }
    }

    pub fn active(&self) -> usize {
        self.active.get()
    }

    pub fn subscribe(&self, f: impl Fn(usize) + 'static) -> Subscription {
        self.active.subscribe(move |i| f(*i))
    }
}

pub struct Tabs;

impl Tabs {
    pub fn provide<R>(tabs: &TabsCoordinator, content: impl FnOnce() -> R) -> R {
        vigil_core::provide(tabs.clone(), content)
    }
}

fn tabs(consumer: &'static str) -> Result<TabsCoordinator> {
    require_local::<TabsCoordinator>(consumer, "Tabs")
}

#[allow(non_snake_case)]
pub fn Tab(index: usize, label: impl Into<String>) -> Result<View> {
    let tabs = tabs("Tab")?;
    let class = if tabs.active() == index {
        "tab tab-active"
    } else {
        "tab"
    };
    Ok(Button(label, move || tabs.select(index))
        .class(class)
        .role(Role::Tab))
}

/// The active panel; nothing when the index has no panel.
#[allow(non_snake_case)]
pub fn TabPanels(panels: Vec<View>) -> Result<Option<View>> {
    let active = tabs("TabPanels")?.active();
    Ok(panels.into_iter().nth(active).map(|panel| {
        vigil_core::Box()
            .class("tab-panels")
            .role(Role::TabPanel)
            .child(panel)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{Row, Text};

    fn build(tabs: &TabsCoordinator) -> View {
        Tabs::provide(tabs, || {
            let list = Row().class("tabs-list").with_children(
                (0..3)
                    .map(|i| Tab(i, format!("Tab {}", i + 1)).unwrap())
                    .collect(),
            );
            let panels = TabPanels(
                (0..3)
                    .map(|i| Text(format!("Content for Tab {}", i + 1)))
                    .collect(),
            )
            .unwrap();
            let root = vigil_core::Box().class("tabs").child(list);
            match panels {
                Some(p) => root.child(p),
                None => root,
            }
        })
    }

    #[test]
    fn test_first_tab_active_by_default() {
        let tabs = TabsCoordinator::default();
        insta::assert_snapshot!(build(&tabs).outline(), @r#"
        Box.tabs
          Row.tabs-list
            Button.tab.tab-active "Tab 1"
            Button.tab "Tab 2"
            Button.tab "Tab 3"
          Box.tab-panels
            Text "Content for Tab 1"
        "#);
    }

    #[test]
    fn test_clicking_tab_switches_panel() {
        let tabs = TabsCoordinator::default();
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        let _sub = {
            let hits = hits.clone();
            tabs.subscribe(move |_| hits.set(hits.get() + 1))
        };

        let view = build(&tabs);
        view.find_text("Tab 3").unwrap().click().unwrap();
        view.find_text("Tab 3").unwrap().click().unwrap();
        assert_eq!(tabs.active(), 2);
        assert_eq!(hits.get(), 1);

        let view = build(&tabs);
        assert!(view.find_text("Content for Tab 3").is_some());
        assert!(view.find_text("Content for Tab 1").is_none());
    }

    #[test]
    fn test_out_of_range_renders_no_panel() {
        let tabs = TabsCoordinator::new(9);
        let view = build(&tabs);
        assert!(view.find(&|v| v.class.as_deref() == Some("tab-panels")).is_none());
    }

    #[test]
    fn test_tab_outside_provider_fails() {
        assert!(Tab(0, "x").is_err());
        assert!(TabPanels(vec![]).is_err());
    }
}
