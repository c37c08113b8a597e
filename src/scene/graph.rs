use crate::foundation::core::Point;
use crate::foundation::error::{MorphError, MorphResult};
use crate::frame::scheduler::{FrameRequestId, FrameRequester};
use crate::scene::shape::{Shape, VisualAttrs};
use crate::scene::surface::{DrawSurface, replay_path};
use serde::{Deserialize, Serialize};

/// Handle to a node owned by a [`Scene`].
///
/// Ids of removed nodes go stale; their slot may be reused with a newer generation, so a stale
/// id never aliases a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    idx: u32,
    generation: u32,
}

impl NodeId {
    fn slot(self) -> usize {
        self.idx as usize
    }
}

/// Scene surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOpts {
    /// Surface width.
    pub width: f64,
    /// Surface height.
    pub height: f64,
}

impl Default for SceneOpts {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug)]
struct Node {
    generation: u32,
    shape: Shape,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    in_scene: bool,
    z_index: i32,
    dirty: bool,
}

/// Retained tree of shapes drawn onto one surface.
///
/// Nodes are owned by the scene and linked parent to children; a node has at most one parent.
/// Any mutation marks the node dirty, which propagates to the root and from there to the
/// scene. The scene asks its [`FrameRequester`] for a redraw only when it turns dirty, so any
/// number of changes between two frames costs one render. The host calls
/// [`Scene::render`] when that frame fires.
pub struct Scene<S: DrawSurface> {
    opts: SceneOpts,
    surface: S,
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: Option<NodeId>,
    dirty: bool,
    requester: Box<dyn FrameRequester>,
    pending: Option<FrameRequestId>,
    draw_order: Vec<NodeId>,
}

impl<S: DrawSurface> Scene<S> {
    /// Create an empty scene drawing onto `surface`.
    pub fn new(surface: S, opts: SceneOpts, requester: impl FrameRequester + 'static) -> Self {
        Self {
            opts,
            surface,
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: None,
            dirty: false,
            requester: Box::new(requester),
            pending: None,
            draw_order: Vec::new(),
        }
    }

    /// Surface width.
    pub fn width(&self) -> f64 {
        self.opts.width
    }

    /// Surface height.
    pub fn height(&self) -> f64 {
        self.opts.height
    }

    /// Resize the drawing area and schedule a redraw.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.opts = SceneOpts { width, height };
        self.set_dirty();
    }

    /// Borrow the drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutably borrow the drawing surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Create a detached node.
    pub fn create_node(&mut self, shape: Shape) -> NodeId {
        let node = |generation| Node {
            generation,
            shape,
            parent: None,
            children: Vec::new(),
            in_scene: false,
            z_index: 0,
            dirty: false,
        };
        if let Some(slot) = self.free_list.pop() {
            let generation = self.generations[slot].wrapping_add(1);
            self.generations[slot] = generation;
            self.nodes[slot] = Some(node(generation));
            NodeId {
                idx: slot as u32,
                generation,
            }
        } else {
            self.nodes.push(Some(node(0)));
            self.generations.push(0);
            NodeId {
                idx: (self.nodes.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// Return `true` when `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Shape of a node.
    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        self.node(id).map(|n| &n.shape)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of a node in insertion order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[][..], |n| n.children.as_slice())
    }

    /// Z-order hint of a node. Stored only; drawing follows insertion order.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node(id).map(|n| n.z_index)
    }

    /// Return `true` when the node has changes not yet rendered.
    pub fn is_node_dirty(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.dirty)
    }

    /// Return `true` when the node is reachable from the root.
    pub fn in_scene(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.in_scene)
    }

    /// Current root.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Return `true` when a render is needed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return `true` while a redraw request is outstanding.
    pub fn has_pending_redraw(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the root. The previous root's subtree stays alive but leaves the scene.
    pub fn set_root(&mut self, root: Option<NodeId>) -> MorphResult<()> {
        if let Some(id) = root {
            let node = self.node_checked(id)?;
            if node.parent.is_some() {
                return Err(MorphError::scene("root node must not have a parent"));
            }
        }
        if let Some(old) = self.root.take() {
            self.set_in_scene(old, false);
        }
        if let Some(id) = root {
            self.set_in_scene(id, true);
        }
        self.root = root;
        self.set_dirty();
        Ok(())
    }

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> MorphResult<()> {
        let parent_in_scene = self.node_checked(parent)?.in_scene;
        if self.node_checked(child)?.parent.is_some() {
            return Err(MorphError::scene("node already has a parent"));
        }
        if self.root == Some(child) {
            return Err(MorphError::scene("the root node cannot become a child"));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(MorphError::scene("adding node would create a cycle"));
        }

        if let Some(n) = self.node_mut(child) {
            n.parent = Some(parent);
        }
        if let Some(n) = self.node_mut(parent) {
            n.children.push(child);
        }
        self.set_in_scene(child, parent_in_scene);
        self.mark_dirty(parent)
    }

    /// Detach `child` from `parent` and drop its whole subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> MorphResult<()> {
        self.node_checked(child)?;
        let siblings = &mut self.node_mut_checked(parent)?.children;
        let Some(pos) = siblings.iter().position(|&c| c == child) else {
            return Err(MorphError::scene("node is not a child of the given parent"));
        };
        siblings.remove(pos);

        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes[id.slot()].take() {
                stack.extend(n.children);
                self.free_list.push(id.slot());
            }
        }
        self.mark_dirty(parent)
    }

    /// Mutate a node's shape and mark it dirty.
    pub fn update<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Shape) -> R) -> MorphResult<R> {
        let node = self.node_mut_checked(id)?;
        let out = f(&mut node.shape);
        self.mark_dirty(id)?;
        Ok(out)
    }

    /// Replace a node's paint.
    pub fn set_visual(&mut self, id: NodeId, visual: VisualAttrs) -> MorphResult<()> {
        self.update(id, |s| s.visual = visual)
    }

    /// Set a node's z-order hint.
    pub fn set_z_index(&mut self, id: NodeId, z_index: i32) -> MorphResult<()> {
        self.node_mut_checked(id)?.z_index = z_index;
        self.mark_dirty(id)
    }

    /// Mark a node dirty and propagate to its ancestors; a dirty root marks the scene dirty.
    pub fn mark_dirty(&mut self, id: NodeId) -> MorphResult<()> {
        self.node_checked(id)?;
        let mut cur = id;
        loop {
            let Some(node) = self.node_mut(cur) else {
                return Ok(());
            };
            node.dirty = true;
            match node.parent {
                Some(p) => cur = p,
                None => {
                    if node.in_scene {
                        self.set_dirty();
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Draw the whole tree and clear every dirty flag.
    ///
    /// The surface is cleared first. Children draw in insertion order after their parent.
    #[tracing::instrument(skip(self), fields(nodes = self.node_count()))]
    pub fn render(&mut self) {
        self.pending = None;
        self.surface
            .clear_rect(0.0, 0.0, self.opts.width + 1.0, self.opts.height + 1.0);
        self.draw_order.clear();

        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes[id.slot()].as_mut() else {
                continue;
            };
            node.dirty = false;
            stack.extend(node.children.iter().rev());

            let Some(outline) = node.shape.outline() else {
                continue;
            };
            replay_path(&mut self.surface, &outline);
            let visual = node.shape.visual;
            if let Some(fill) = visual.fill {
                self.surface.fill(fill);
            }
            if let Some(stroke) = visual.stroke {
                self.surface.stroke(stroke, visual.line_width);
            }
            self.draw_order.push(id);
        }
        self.dirty = false;
    }

    /// Topmost node drawn by the last render whose shape contains `pt`, by fill area or by
    /// stroke.
    pub fn hit_test(&self, pt: Point) -> Option<NodeId> {
        self.draw_order.iter().rev().copied().find(|&id| {
            self.node(id)
                .is_some_and(|n| n.shape.hit_test(pt) || n.shape.hit_test_stroke(pt))
        })
    }

    fn set_dirty(&mut self) {
        if self.dirty {
            return;
        }
        self.dirty = true;
        if self.pending.is_none() {
            let id = self.requester.request_frame();
            tracing::debug!(id = id.0, "scheduled scene redraw");
            self.pending = Some(id);
        }
    }

    fn set_in_scene(&mut self, id: NodeId, in_scene: bool) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.node_mut(id) {
                n.in_scene = in_scene;
                stack.extend(n.children.iter().copied());
            }
        }
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&cur| self.parent(cur))
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.slot())?
            .as_ref()
            .filter(|n| n.generation == id.generation)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.slot())?
            .as_mut()
            .filter(|n| n.generation == id.generation)
    }

    fn node_checked(&self, id: NodeId) -> MorphResult<&Node> {
        self.node(id).ok_or_else(|| unknown_node(id))
    }

    fn node_mut_checked(&mut self, id: NodeId) -> MorphResult<&mut Node> {
        self.node_mut(id).ok_or_else(|| unknown_node(id))
    }
}

fn unknown_node(id: NodeId) -> MorphError {
    MorphError::scene(format!("unknown node {id:?}"))
}

impl<S: DrawSurface> std::fmt::Debug for Scene<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("opts", &self.opts)
            .field("nodes", &self.node_count())
            .field("root", &self.root)
            .field("dirty", &self.dirty)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
