//! Scripted walk through the dropdown, modal and toast patterns.
//!
//! Run with `RUST_LOG=debug` to watch the coordinators mount, react to input
//! and tear down.

use std::time::Duration;

use vigil_core::prelude::*;
use vigil_overlay::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (env, clock) = Environment::manual();
    let stage = Stage::new();
    let app = stage.alloc_node(None);
    let scope = Scope::new();

    scope.run(|| -> anyhow::Result<()> {
        dropdown_demo(&env, &stage, app)?;
        modal_demo(&env, &stage, app)?;
        toast_demo(&env, &clock)?;
        Ok(())
    })?;

    scope.dispose();
    log::info!(
        "teardown: {} key / {} pointer listener(s), {} timer(s) left",
        env.listener_count(EventKind::KeyDown),
        env.listener_count(EventKind::PointerDown),
        env.pending_timers()
    );
    Ok(())
}

fn dropdown_demo(env: &Environment, stage: &Stage, app: NodeId) -> anyhow::Result<()> {
    let menu = OverlayCoordinator::mount(env, stage, Some(app), OverlayConfig::default());

    let render = {
        let menu = menu.clone();
        move || -> Result<View> {
            Dropdown::provide(
                &menu,
                |value: &&'static str| {
                    log::info!("Selected: {value}");
                    Ok(())
                },
                || -> Result<View> {
                    let trigger = DropdownTrigger("Actions")?;
                    let items = [("edit", "Edit"), ("duplicate", "Duplicate"), ("delete", "Delete")]
                        .into_iter()
                        .map(|(value, label)| DropdownItem(value, label))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Dropdown::root(trigger, DropdownMenu(items)?))
                },
            )
        }
    };

    let view = render()?;
    view.find_text("Actions").map(View::click).transpose()?;
    let mounted = stage
        .present(menu.region(), Surface::Inline, Some(render()?))
        .unwrap_or(view);
    log::info!("dropdown open:\n{}", mounted.outline());

    if let Some(item) = mounted.find_text("Duplicate") {
        item.click()?;
    }
    log::info!("dropdown after select: open = {}", menu.is_open());

    menu.open();
    env.dispatch(KeyEvent::new(Key::Escape));
    log::info!("dropdown after Escape: open = {}", menu.is_open());
    Ok(())
}

fn modal_demo(env: &Environment, stage: &Stage, app: NodeId) -> anyhow::Result<()> {
    let modal = OverlayCoordinator::mount(env, stage, Some(app), OverlayConfig::default());
    let projection = {
        let modal = modal.clone();
        Projection::new(stage, modal.region(), modal_surface(), move || {
            Modal(&modal, "Modal Title", "This is a modal using Portal Pattern")
        })
    };
    let source = modal.clone();
    effect(move || {
        projection
            .bind(move |refresh| source.subscribe(move |_| refresh()))
            .into()
    });

    ModalToggle(&modal, "Open Modal").click()?;
    if let Surface::Detached(region) = modal_surface() {
        for view in stage.region_contents(region) {
            log::info!("modal-root:\n{}", view.outline());
        }
    }

    env.dispatch(PointerEvent::press(None));
    log::info!("modal after outside press: open = {}", modal.is_open());
    Ok(())
}

fn toast_demo(env: &Environment, clock: &ManualClock) -> anyhow::Result<()> {
    let queue = NotificationQueue::mount(env, ToastConfig::default());

    ToastProvider::provide(&queue, || -> anyhow::Result<()> {
        let toast = use_toast()?;
        toast.show("Profile updated!", Severity::Success)?;
        clock.advance(Duration::from_millis(1000));
        let oops = toast.show_labeled("Oops", "error")?;
        log::info!("toasts:\n{}", ToastList(&queue).outline());

        toast.dismiss(oops);
        toast.dismiss(oops);
        Ok(())
    })?;

    clock.advance(Duration::from_millis(2000));
    let expired = env.pump();
    log::info!("{expired} toast(s) expired, {} left", queue.len());
    Ok(())
}
