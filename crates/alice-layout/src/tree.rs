//! Layout tree data structures.
//!
//! The layout tree records what a pass placed: every layout region, every
//! line of a region, and every control and window, each with its rectangle
//! in the coordinates the host was given.

use alice_core::{IVec2, LayoutMode, Rect, TemplateId};

use crate::host::{ControlIndex, WindowIndex};

/// Unique identifier for a layout node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutNodeId(pub usize);

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A layout level's region, before margins
    Region {
        mode: LayoutMode,
        template: Option<TemplateId>,
    },
    /// One solved run of a region
    Line {
        /// Zero-based run number within the region
        index: usize,
        item_count: usize,
        end_page: bool,
    },
    Control {
        window: WindowIndex,
        control: ControlIndex,
    },
    Window {
        window: WindowIndex,
    },
}

/// A node in the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: LayoutNodeId,
    pub kind: NodeKind,
    /// Placed rectangle
    pub bounds: Rect,
    /// Drawing layer; nested sub-layouts draw one layer up
    pub layer: u32,
    /// Parent node ID (None for root)
    pub parent: Option<LayoutNodeId>,
    pub children: Vec<LayoutNodeId>,
}

impl LayoutNode {
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Control { .. } | NodeKind::Window { .. })
    }
}

/// What lies under a point, as used for hover and click handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseProbe {
    /// Innermost window under the point
    pub window: Option<WindowIndex>,
    /// Topmost control under the point, with its owning window
    pub control: Option<(WindowIndex, ControlIndex)>,
}

/// Everything placed by one layout pass.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    /// Nodes in placement order; a node's id is its index
    nodes: Vec<LayoutNode>,
    roots: Vec<LayoutNodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, bounds: Rect, layer: u32, parent: Option<LayoutNodeId>) -> LayoutNodeId {
        let id = LayoutNodeId(self.nodes.len());
        self.nodes.push(LayoutNode {
            id,
            kind,
            bounds,
            layer,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Add a root node.
    pub fn add_root(&mut self, kind: NodeKind, bounds: Rect, layer: u32) -> LayoutNodeId {
        let id = self.push(kind, bounds, layer, None);
        self.roots.push(id);
        id
    }

    /// Add a child node to a parent.
    pub fn add_child(&mut self, parent_id: LayoutNodeId, kind: NodeKind, bounds: Rect, layer: u32) -> LayoutNodeId {
        let id = self.push(kind, bounds, layer, Some(parent_id));
        if let Some(parent) = self.nodes.get_mut(parent_id.0) {
            parent.children.push(id);
        }
        id
    }

    /// Add a node under `parent`, or as a root when there is none.
    pub fn add(&mut self, parent: Option<LayoutNodeId>, kind: NodeKind, bounds: Rect, layer: u32) -> LayoutNodeId {
        match parent {
            Some(parent) => self.add_child(parent, kind, bounds, layer),
            None => self.add_root(kind, bounds, layer),
        }
    }

    pub fn get(&self, id: LayoutNodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> &[LayoutNodeId] {
        &self.roots
    }

    /// Iterate over all nodes in placement order.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get children of a node.
    pub fn children(&self, id: LayoutNodeId) -> impl Iterator<Item = &LayoutNode> {
        self.nodes
            .get(id.0)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|child_id| self.nodes.get(child_id.0))
    }

    /// Line nodes directly under `region`.
    pub fn lines(&self, region: LayoutNodeId) -> impl Iterator<Item = &LayoutNode> {
        self.children(region)
            .filter(|n| matches!(n.kind, NodeKind::Line { .. }))
    }

    /// Rectangles at which a control was placed, in placement order.
    pub fn control_bounds(&self, window: WindowIndex, control: ControlIndex) -> Vec<Rect> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Control { window, control })
            .map(|n| n.bounds)
            .collect()
    }

    /// Rectangles at which a window was placed, in placement order.
    pub fn window_bounds(&self, window: WindowIndex) -> Vec<Rect> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Window { window })
            .map(|n| n.bounds)
            .collect()
    }

    /// Find the control or window drawn on top at a point.
    ///
    /// Later siblings draw over earlier ones and children over their parent.
    /// Regions and lines are transparent; their bounds do not clip, since
    /// content may overflow them.
    pub fn hit_test(&self, point: IVec2) -> Option<LayoutNodeId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root_id| self.hit_test_recursive(root_id, point))
    }

    fn hit_test_recursive(&self, id: LayoutNodeId, point: IVec2) -> Option<LayoutNodeId> {
        let node = self.nodes.get(id.0)?;

        for &child_id in node.children.iter().rev() {
            if let Some(hit) = self.hit_test_recursive(child_id, point) {
                return Some(hit);
            }
        }

        (node.is_element() && node.bounds.contains(point)).then_some(id)
    }

    /// Report the window and control under a point.
    pub fn probe(&self, point: IVec2) -> MouseProbe {
        let Some(hit) = self.hit_test(point) else {
            return MouseProbe::default();
        };

        let mut probe = MouseProbe::default();
        let mut current = self.get(hit);
        while let Some(node) = current {
            match node.kind {
                NodeKind::Control { window, control } if probe.control.is_none() => {
                    probe.control = Some((window, control));
                }
                NodeKind::Window { window } if node.bounds.contains(point) => {
                    probe.window = Some(window);
                    break;
                }
                _ => {}
            }
            current = node.parent.and_then(|p| self.get(p));
        }
        if probe.window.is_none() {
            probe.window = probe.control.map(|(window, _)| window);
        }
        probe
    }
}
