//! # Render surfaces
//!
//! A coordinator decides *what* to show through a pure projection
//! (`state -> Option<View>`); a [`Surface`] decides *where* it goes:
//!
//! - [`Surface::Inline`] mounts the view at the owner's place in the tree.
//! - [`Surface::Detached`] mounts it into a top-level region (a portal),
//!   shared by every owner that asks for the same region name.
//!
//! Either way the mounted nodes stay logical descendants of their owner, so
//! "was this press inside the overlay?" gives the same answer in both modes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use parking_lot::Mutex;

use crate::signal::Subscription;
use crate::tree::{LogicalTree, NodeId};
use crate::view::View;
use crate::{Rect, Vec2};

/// Identity of a detached region, stable for the life of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(usize);

static REGIONS: Mutex<Vec<String>> = parking_lot::const_mutex(Vec::new());

/// Resolves `name` to its region, creating it on first request. Creation is
/// serialized, so concurrent callers all get the same id.
pub fn detached_region(name: &str) -> RegionId {
    let mut regions = REGIONS.lock();
    if let Some(i) = regions.iter().position(|r| r == name) {
        return RegionId(i);
    }
    regions.push(name.to_string());
    log::debug!("surface: created detached region {name:?}");
    RegionId(regions.len() - 1)
}

pub fn region_name(id: RegionId) -> Option<String> {
    REGIONS.lock().get(id.0).cloned()
}

/// Number of detached regions created so far in this process.
pub fn region_count() -> usize {
    REGIONS.lock().len()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Inline,
    Detached(RegionId),
}

impl Surface {
    pub fn detached(name: &str) -> Self {
        Surface::Detached(detached_region(name))
    }
}

struct Mount {
    owner: NodeId,
    surface: Surface,
    root: NodeId,
    view: View,
}

#[derive(Default)]
struct StageInner {
    tree: LogicalTree,
    region_roots: HashMap<RegionId, NodeId>,
    mounts: Vec<Mount>,
}

/// The boundary to the rendering engine: the logical tree plus whatever is
/// currently mounted, per owner.
#[derive(Clone, Default)]
pub struct Stage {
    inner: Rc<RefCell<StageInner>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_node(&self, parent: Option<NodeId>) -> NodeId {
        self.inner.borrow_mut().tree.alloc(parent)
    }

    /// Removes `node`, its logical subtree and any mounts owned inside it.
    pub fn remove_node(&self, node: NodeId) {
        let removed: Vec<Mount> = {
            let mut inner = self.inner.borrow_mut();
            let StageInner { tree, mounts, .. } = &mut *inner;
            let (gone, kept) = std::mem::take(mounts)
                .into_iter()
                .partition(|m| tree.contains(node, m.owner));
            *mounts = kept;
            tree.remove(node);
            gone
        };
        // Views may own the last handle to a coordinator whose teardown
        // calls back into the stage.
        drop(removed);
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.inner.borrow().tree.is_alive(node)
    }

    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inner.borrow().tree.contains(ancestor, node)
    }

    pub fn logical_parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().tree.parent(node)
    }

    pub fn node_count(&self) -> usize {
        self.inner.borrow().tree.len()
    }

    pub fn hit(&self, p: Vec2) -> Option<NodeId> {
        self.inner.borrow().tree.hit_test(p)
    }

    pub fn set_bounds(&self, node: NodeId, bounds: Rect) {
        self.inner.borrow_mut().tree.set_bounds(node, bounds);
    }

    /// Root node of a detached region in this stage, created on first use.
    pub fn region_root(&self, region: RegionId) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        if let Some(root) = inner.region_roots.get(&region) {
            return *root;
        }
        let root = inner.tree.alloc(None);
        inner.region_roots.insert(region, root);
        log::debug!("stage: mounted region {region:?} at {root}");
        root
    }

    pub fn region_root_count(&self) -> usize {
        self.inner.borrow().region_roots.len()
    }

    /// Replaces whatever `owner` had mounted with `view`, or unmounts it when
    /// `view` is `None`. Returns the mounted copy with node ids filled in.
    pub fn present(&self, owner: NodeId, surface: Surface, view: Option<View>) -> Option<View> {
        let region_root = match surface {
            Surface::Detached(region) => Some(self.region_root(region)),
            Surface::Inline => None,
        };

        let old = {
            let mut inner = self.inner.borrow_mut();
            let pos = inner.mounts.iter().position(|m| m.owner == owner);
            pos.map(|pos| {
                let old = inner.mounts.remove(pos);
                inner.tree.remove(old.root);
                old
            })
        };
        drop(old);

        let mut view = view?;
        let mut inner = self.inner.borrow_mut();
        if !inner.tree.is_alive(owner) {
            log::warn!("stage: present for unmounted owner {owner}; ignoring");
            return None;
        }

        assign_nodes(&mut inner.tree, &mut view, owner);
        let root = view.id.unwrap_or(owner);
        log::trace!(
            "stage: {owner} presented {:?} ({})",
            surface,
            region_root.map_or("inline".to_string(), |r| format!("under {r}"))
        );
        inner.mounts.push(Mount {
            owner,
            surface,
            root,
            view: view.clone(),
        });
        Some(view)
    }

    pub fn mounted(&self, owner: NodeId) -> Option<View> {
        self.inner
            .borrow()
            .mounts
            .iter()
            .find(|m| m.owner == owner)
            .map(|m| m.view.clone())
    }

    /// Views mounted into `region`, in mount order.
    pub fn region_contents(&self, region: RegionId) -> Vec<View> {
        self.inner
            .borrow()
            .mounts
            .iter()
            .filter(|m| m.surface == Surface::Detached(region))
            .map(|m| m.view.clone())
            .collect()
    }

    /// Where `owner`'s output is painted: the owner itself when inline, the
    /// region root when detached.
    pub fn physical_parent(&self, owner: NodeId) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let mount = inner.mounts.iter().find(|m| m.owner == owner)?;
        match mount.surface {
            Surface::Inline => Some(owner),
            Surface::Detached(region) => inner.region_roots.get(&region).copied(),
        }
    }
}

fn assign_nodes(tree: &mut LogicalTree, view: &mut View, parent: NodeId) {
    let id = tree.alloc(Some(parent));
    if let Some(bounds) = view.bounds {
        tree.set_bounds(id, bounds);
    }
    view.id = Some(id);
    for child in &mut view.children {
        assign_nodes(tree, child, id);
    }
}

/// Keeps an owner's output in sync with its coordinator: every
/// [`Projection::refresh`] re-runs the projection and re-presents it.
#[derive(Clone)]
pub struct Projection {
    stage: Stage,
    owner: NodeId,
    surface: Surface,
    project: Rc<dyn Fn() -> Option<View>>,
}

impl Projection {
    pub fn new(
        stage: &Stage,
        owner: NodeId,
        surface: Surface,
        project: impl Fn() -> Option<View> + 'static,
    ) -> Self {
        Self {
            stage: stage.clone(),
            owner,
            surface,
            project: Rc::new(project),
        }
    }

    pub fn refresh(&self) -> Option<View> {
        self.stage
            .present(self.owner, self.surface, (self.project)())
    }

    /// Presents now and again whenever `subscribe` reports a change. The
    /// returned subscription also unmounts the output when dropped.
    pub fn bind(self, subscribe: impl FnOnce(Box<dyn Fn()>) -> Subscription) -> Subscription {
        self.refresh();
        let this = self.clone();
        let sub = subscribe(Box::new(move || {
            this.refresh();
        }));
        Subscription::new(move || {
            drop(sub);
            self.stage.present(self.owner, self.surface, None);
        })
    }
}
