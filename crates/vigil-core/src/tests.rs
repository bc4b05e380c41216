#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use crate::*;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription_drops() {
        let sig = signal(0);
        let seen = Rc::new(Cell::new(0));

        let sub = {
            let seen = seen.clone();
            sig.subscribe(move |v| seen.set(*v))
        };
        sig.set(7);
        assert_eq!(seen.get(), 7);
        assert_eq!(sig.subscriber_count(), 1);

        drop(sub);
        assert_eq!(sig.subscriber_count(), 0);
        sig.set(9);
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn test_signal_set_if_changed() {
        let sig = signal(false);
        let hits = Rc::new(Cell::new(0));
        let _sub = {
            let hits = hits.clone();
            sig.subscribe(move |_| hits.set(hits.get() + 1))
        };
        assert!(!sig.set_if_changed(false));
        assert!(sig.set_if_changed(true));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_signal_reentrant_write() {
        let sig = signal(0);
        let _sub = {
            let sig2 = sig.clone();
            sig.subscribe(move |v| {
                if *v == 1 {
                    sig2.set(2);
                }
            })
        };
        sig.set(1);
        assert_eq!(sig.get(), 2);
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(RefCell::new(false));

        let scope = Scope::new();
        let cleaned_up_clone = cleaned_up.clone();
        scope.add_disposer(move || {
            *cleaned_up_clone.borrow_mut() = true;
        });

        assert!(!*cleaned_up.borrow());
        scope.dispose();
        assert!(*cleaned_up.borrow());
    }

    #[test]
    fn test_scope_children_first() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let scope = Scope::new();
        let child = scope.child();
        {
            let order = order.clone();
            scope.add_disposer(move || order.borrow_mut().push("parent"));
        }
        {
            let order = order.clone();
            child.add_disposer(move || order.borrow_mut().push("child"));
        }
        scope.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
        assert!(child.is_disposed());
    }

    #[test]
    fn test_scope_run_sets_current() {
        assert!(current_scope().is_none());
        let scope = Scope::new();
        scope.run(|| {
            scoped_effect(|| Box::new(|| {}));
        });
        assert_eq!(scope.pending_disposers(), 1);
        assert!(current_scope().is_none());
    }

    #[test]
    fn test_dispose_runs_once() {
        let n = Rc::new(Cell::new(0));
        let d = {
            let n = n.clone();
            Dispose::new(move || n.set(n.get() + 1))
        };
        let d2 = d.clone();
        d.run();
        d2.run();
        assert_eq!(n.get(), 1);
        assert!(d.is_spent());
    }

    #[test]
    fn test_effect_teardown_runs_once_with_scope() {
        let n = Rc::new(Cell::new(0));
        let scope = Scope::new();
        let teardown = scope.run(|| {
            let n = n.clone();
            effect(move || on_unmount(move || n.set(n.get() + 1)))
        });
        assert_eq!(scope.pending_disposers(), 1);

        teardown.run();
        scope.dispose();
        assert_eq!(n.get(), 1);
    }

    #[test]
    fn test_effect_from_subscription() {
        let sig = signal(0);
        let scope = Scope::new();
        scope.run(|| {
            let sub = sig.subscribe(|_| {});
            effect(move || sub.into());
        });
        assert_eq!(sig.subscriber_count(), 1);

        scope.dispose();
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_prelude_is_enough_to_mount() {
        use crate::prelude::{Environment, EventKind, Scope, Stage, effect, on_unmount};

        let (env, _clock) = Environment::manual();
        let stage = Stage::new();
        let scope = Scope::new();
        scope.run(|| {
            let guard = env.on_key(|_| {});
            let region = stage.alloc_node(None);
            let stage = stage.clone();
            effect(move || {
                on_unmount(move || {
                    drop(guard);
                    stage.remove_node(region);
                })
            });
        });
        assert_eq!(env.listener_count(EventKind::KeyDown), 1);

        scope.dispose();
        assert_eq!(env.listener_count(EventKind::KeyDown), 0);
        assert_eq!(stage.node_count(), 0);
    }

    #[test]
    fn test_locals_provide_and_missing() {
        #[derive(Clone, Debug, PartialEq)]
        struct Token(u32);

        assert_eq!(
            require_local::<Token>("use_token", "TokenProvider"),
            Err(Error::MissingProvider {
                consumer: "use_token",
                provider: "TokenProvider",
            })
        );

        provide(Token(1), || {
            assert_eq!(local::<Token>(), Some(Token(1)));
            provide(Token(2), || assert_eq!(local::<Token>(), Some(Token(2))));
            assert_eq!(local::<Token>(), Some(Token(1)));
        });
        assert_eq!(local::<Token>(), None);
        assert_eq!(locals::locals_depth(), 0);
    }

    #[test]
    fn test_missing_provider_message() {
        let err = Error::MissingProvider {
            consumer: "use_toast",
            provider: "ToastProvider",
        };
        insta::assert_snapshot!(err.to_string(), @"use_toast must be used within <ToastProvider>");
    }

    #[test]
    fn test_listener_guard_release() {
        let (env, _clock) = Environment::manual();
        let hits = Rc::new(Cell::new(0));
        let guard = {
            let hits = hits.clone();
            env.on_key(move |_| hits.set(hits.get() + 1))
        };
        assert_eq!(env.dispatch(KeyEvent::new(Key::Escape)), 1);
        assert!(guard.is_registered());

        drop(guard);
        assert_eq!(env.listener_count(EventKind::KeyDown), 0);
        assert_eq!(env.dispatch(KeyEvent::new(Key::Escape)), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_dispatch_filters_by_kind() {
        let (env, _clock) = Environment::manual();
        let keys = Rc::new(Cell::new(0));
        let _k = {
            let keys = keys.clone();
            env.on_key(move |_| keys.set(keys.get() + 1))
        };
        env.dispatch(PointerEvent::press(None));
        assert_eq!(keys.get(), 0);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let (env, _clock) = Environment::manual();
        let second: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));
        let second_ran = Rc::new(Cell::new(false));

        let _first = {
            let second = second.clone();
            env.on_key(move |_| {
                second.borrow_mut().take();
            })
        };
        *second.borrow_mut() = Some({
            let second_ran = second_ran.clone();
            env.on_key(move |_| second_ran.set(true))
        });

        assert_eq!(env.dispatch(KeyEvent::new(Key::Enter)), 1);
        assert!(!second_ran.get());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let (env, clock) = Environment::manual();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut handles = Vec::new();
        for (label, ms) in [("b", 20), ("a", 10), ("c", 20)] {
            let order = order.clone();
            handles.push(env.set_timeout(Duration::from_millis(ms), move || {
                order.borrow_mut().push(label)
            }));
        }

        clock.advance(Duration::from_millis(9));
        assert_eq!(env.pump(), 0);
        clock.advance(Duration::from_millis(11));
        assert_eq!(env.pump(), 3);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
        assert!(handles.iter().all(|h| !h.is_pending()));
    }

    #[test]
    fn test_timer_cancel_and_drop() {
        let (env, clock) = Environment::manual();
        let fired = Rc::new(Cell::new(0));

        let cancelled = {
            let fired = fired.clone();
            env.set_timeout(Duration::from_millis(5), move || fired.set(fired.get() + 1))
        };
        assert!(cancelled.cancel());

        {
            let fired = fired.clone();
            let _dropped =
                env.set_timeout(Duration::from_millis(5), move || fired.set(fired.get() + 1));
        }

        {
            let fired = fired.clone();
            env.set_timeout(Duration::from_millis(5), move || fired.set(fired.get() + 1))
                .detach();
        }

        assert_eq!(env.pending_timers(), 1);
        clock.advance(Duration::from_millis(5));
        assert_eq!(env.pump(), 1);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_dropping_timer_releases_captured_listener() {
        let (env, _clock) = Environment::manual();
        let guard = env.on_key(|_| {});
        let timer = env.set_timeout(Duration::from_millis(5), move || drop(guard));
        assert_eq!(env.listener_count(EventKind::KeyDown), 1);

        drop(timer);
        assert_eq!(env.pending_timers(), 0);
        assert_eq!(env.listener_count(EventKind::KeyDown), 0);
    }

    #[test]
    fn test_cancelling_timer_releases_captured_timer() {
        let (env, _clock) = Environment::manual();
        let inner = env.set_timeout(Duration::from_millis(50), || {});
        let outer = env.set_timeout(Duration::from_millis(5), move || drop(inner));
        assert_eq!(env.pending_timers(), 2);

        assert!(outer.cancel());
        assert_eq!(env.pending_timers(), 0);
    }

    #[test]
    fn test_dropping_listener_releases_captured_handles() {
        let (env, _clock) = Environment::manual();
        let timer = env.set_timeout(Duration::from_millis(5), || {});
        let other = env.on_pointer_down(|_| {});
        let guard = env.on_key(move |_| {
            let _ = (&timer, &other);
        });

        drop(guard);
        assert_eq!(env.pending_timers(), 0);
        assert_eq!(env.listener_count(EventKind::KeyDown), 0);
        assert_eq!(env.listener_count(EventKind::PointerDown), 0);
    }

    #[test]
    fn test_unsubscribe_releases_captured_subscription() {
        let sig = signal(0);
        let nested = sig.subscribe(|_| {});
        let outer = sig.subscribe(move |_| {
            let _ = &nested;
        });
        assert_eq!(sig.subscriber_count(), 2);

        drop(outer);
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_overwritten_value_may_touch_signal() {
        let sig: Signal<Rc<Option<Subscription>>> = signal(Rc::new(None));
        let sub = sig.subscribe(|_| {});
        sig.set(Rc::new(Some(sub)));
        assert_eq!(sig.subscriber_count(), 1);

        sig.set(Rc::new(None));
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_logical_containment() {
        let mut tree = LogicalTree::new();
        let root = tree.alloc(None);
        let a = tree.alloc(Some(root));
        let b = tree.alloc(Some(a));
        let other = tree.alloc(None);

        assert!(tree.contains(root, b));
        assert!(tree.contains(a, a));
        assert!(!tree.contains(b, a));
        assert!(!tree.contains(root, other));

        assert_eq!(tree.remove(a), 2);
        assert!(!tree.is_alive(b));
        assert!(tree.is_alive(root));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut tree = LogicalTree::new();
        let below = tree.alloc(None);
        let above = tree.alloc(None);
        tree.set_bounds(below, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.set_bounds(above, Rect::new(10.0, 10.0, 20.0, 20.0));

        assert_eq!(tree.hit_test(Vec2::new(15.0, 15.0)), Some(above));
        assert_eq!(tree.hit_test(Vec2::new(50.0, 50.0)), Some(below));
        assert_eq!(tree.hit_test(Vec2::new(500.0, 50.0)), None);
    }

    #[test]
    fn test_detached_region_created_once() {
        let a = detached_region("test-once-root");
        let b = detached_region("test-once-root");
        assert_eq!(a, b);
        assert_eq!(region_name(a).as_deref(), Some("test-once-root"));

        let stage = Stage::new();
        let r1 = stage.region_root(a);
        let r2 = stage.region_root(b);
        assert_eq!(r1, r2);
        assert_eq!(stage.region_root_count(), 1);
    }

    #[test]
    fn test_detached_region_across_threads() {
        let ids: Vec<RegionId> = (0..4)
            .map(|_| std::thread::spawn(|| detached_region("test-threaded-root")))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_detached_mount_keeps_logical_owner() {
        let stage = Stage::new();
        let owner = stage.alloc_node(None);
        let surface = Surface::detached("test-portal-root");

        let mounted = stage
            .present(owner, surface, Some(Column().child(Text("hi"))))
            .unwrap();
        let leaf = mounted.children[0].id.unwrap();

        assert!(stage.contains(owner, leaf));
        let Surface::Detached(region) = surface else {
            unreachable!()
        };
        assert_eq!(stage.physical_parent(owner), Some(stage.region_root(region)));
        assert_eq!(stage.region_contents(region).len(), 1);

        stage.present(owner, surface, None);
        assert!(!stage.is_alive(leaf));
        assert!(stage.region_contents(region).is_empty());
    }

    #[test]
    fn test_inline_mount_replaces_previous() {
        let stage = Stage::new();
        let owner = stage.alloc_node(None);
        let first = stage
            .present(owner, Surface::Inline, Some(Text("one")))
            .unwrap();
        stage.present(owner, Surface::Inline, Some(Text("two")));

        assert!(!stage.is_alive(first.id.unwrap()));
        assert_eq!(stage.physical_parent(owner), Some(owner));
        let text = stage.mounted(owner).and_then(|v| v.text().map(str::to_string));
        assert_eq!(text.as_deref(), Some("two"));
    }

    #[test]
    fn test_projection_bind_follows_signal() {
        let stage = Stage::new();
        let owner = stage.alloc_node(None);
        let open = signal(false);

        let sub = {
            let open_read = open.clone();
            let open_sub = open.clone();
            Projection::new(&stage, owner, Surface::Inline, move || {
                open_read.get().then(|| Text("menu"))
            })
            .bind(move |f| open_sub.subscribe(move |_| f()))
        };

        assert!(stage.mounted(owner).is_none());
        open.set(true);
        assert!(stage.mounted(owner).is_some());
        drop(sub);
        assert!(stage.mounted(owner).is_none());
        assert_eq!(open.subscriber_count(), 0);
    }

    #[test]
    fn test_view_outline() {
        let view = Column()
            .class("toast")
            .child(Text("Saved").class("toast-message success"))
            .child(Button("Close", || {}));
        insta::assert_snapshot!(view.outline(), @r#"
        Column.toast
          Text.toast-message.success "Saved"
          Button "Close"
        "#);
    }

    #[test]
    fn test_view_click_propagates_error() {
        let view = TryButton("Boom", || Err(anyhow::anyhow!("nope")));
        let err = view.click().unwrap_err();
        assert_eq!(err.to_string(), "nope");
        assert!(Text("inert").click().is_ok());
    }
}
