use std::collections::HashMap;
use std::fmt;

use crate::{Rect, Vec2};

/// Stable identity of a node in the logical tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Node {
    parent: Option<NodeId>,
    bounds: Option<Rect>,
    // Paint order for hit testing: later wins.
    paint: u64,
}

/// Logical parent/child relationships between mounted nodes.
///
/// This is what "inside" means for outside-press detection. A node mounted
/// into a detached region still has its logical owner as an ancestor here,
/// even though it is painted somewhere else.
#[derive(Default)]
pub struct LogicalTree {
    next_id: u64,
    next_paint: u64,
    nodes: HashMap<NodeId, Node>,
}

impl LogicalTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        let parent = parent.filter(|p| self.nodes.contains_key(p));
        self.nodes.insert(
            id,
            Node {
                parent,
                bounds: None,
                paint: 0,
            },
        );
        id
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` when `node` is `ancestor` or lies anywhere below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return self.nodes.contains_key(&id);
            }
            cur = self.parent(id);
        }
        false
    }

    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        self.next_paint += 1;
        let paint = self.next_paint;
        if let Some(n) = self.nodes.get_mut(&id) {
            n.bounds = Some(bounds);
            n.paint = paint;
        }
    }

    /// Removes `id` and everything logically below it. Returns how many
    /// nodes went away.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if !self.nodes.contains_key(&id) {
            return 0;
        }
        let doomed: Vec<NodeId> = self
            .nodes
            .keys()
            .copied()
            .filter(|n| self.contains(id, *n))
            .collect();
        for n in &doomed {
            self.nodes.remove(n);
        }
        doomed.len()
    }

    /// Topmost node whose bounds contain `p`.
    pub fn hit_test(&self, p: Vec2) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.bounds.is_some_and(|b| b.contains(p)))
            .max_by_key(|(_, n)| n.paint)
            .map(|(id, _)| *id)
    }
}
