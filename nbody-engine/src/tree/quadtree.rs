// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Barnes-Hut quad-tree
//!
//! The tree partitions the simulation box recursively into four quadrants so
//! that distant groups of bodies can be replaced by a single point mass at
//! their center of mass.
//!
//! # Layout
//!
//! Nodes live in one index-addressed arena (`Vec<Node>`); the four children
//! of a subdivided node are allocated contiguously, so an internal node only
//! stores the index of its first child. Inserted bodies live in a second
//! arena of slots chained into per-leaf buckets. [`QuadTree::rebuild`] clears
//! both vectors without releasing their capacity, so a tree rebuilt every
//! tick stops allocating once it has seen its largest population.
//!
//! # Invariants
//!
//! - A node is empty, a leaf with a bucket of bodies, or internal with exactly
//!   four children. Never both, never partially subdivided.
//! - A leaf holds more than one body only at the depth limit, which is how
//!   coincident bodies are kept from splitting forever.
//! - A node's mass is the sum of the masses stored in its subtree, and its
//!   center of mass is the mass-weighted average of its non-empty children
//!   (or of its bucket).
//!
//! # Force evaluation
//!
//! For a target body, a node with mass is handled as follows:
//!
//! - leaf: exact pair forces from every bucket body whose handle differs from
//!   the target's;
//! - internal: with `d` the softened distance to the center of mass and
//!   `s = max(width, height)`, if `s / d < θ` the node acts as one point
//!   mass, otherwise its four children are evaluated and summed.

use super::boundary::Boundary;
use crate::body::{BasicBody, Force, Position};
use crate::error::{PhysicsError, Result};
use crate::forces::Gravity;

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Empty,
    Leaf { head: usize, count: usize },
    Internal { first_child: usize },
}

#[derive(Debug, Clone)]
struct Node {
    boundary: Boundary,
    depth: usize,
    mass: f64,
    center_of_mass: Position,
    kind: NodeKind,
}

impl Node {
    fn empty(boundary: Boundary, depth: usize) -> Self {
        Node {
            boundary,
            depth,
            mass: 0.0,
            center_of_mass: Position::zero(),
            kind: NodeKind::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    body: BasicBody,
    next: Option<usize>,
}

/// Statistics for monitoring arena reuse across rebuilds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of rebuilds performed
    pub rebuilds: usize,
    /// Number of rebuilds that fit in the existing allocation
    pub reuses: usize,
    /// Number of rebuilds that had to grow the node arena
    pub growths: usize,
    /// Largest node count seen
    pub peak_nodes: usize,
}

impl ArenaStats {
    /// Percentage of rebuilds served without growing the arena
    pub fn reuse_rate(&self) -> f64 {
        if self.rebuilds == 0 {
            0.0
        } else {
            (self.reuses as f64 / self.rebuilds as f64) * 100.0
        }
    }
}

/// Read-only view of one tree node
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    tree: &'a QuadTree,
    index: usize,
}

impl<'a> NodeView<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.index]
    }

    /// Arena index of this node
    pub fn index(&self) -> usize {
        self.index
    }

    /// Region covered by this node
    pub fn boundary(&self) -> Boundary {
        self.node().boundary
    }

    /// Depth below the root (the root is 0)
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// Aggregate mass of the subtree
    pub fn mass(&self) -> f64 {
        self.node().mass
    }

    /// Aggregate center of mass of the subtree
    pub fn center_of_mass(&self) -> Position {
        self.node().center_of_mass
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        !matches!(self.node().kind, NodeKind::Internal { .. })
    }

    /// The four children, lower-left first, if subdivided
    pub fn children(&self) -> Option<[NodeView<'a>; 4]> {
        match self.node().kind {
            NodeKind::Internal { first_child } => Some([0, 1, 2, 3].map(|q| NodeView {
                tree: self.tree,
                index: first_child + q,
            })),
            _ => None,
        }
    }

    /// Bodies stored directly in this node (empty unless a leaf)
    pub fn leaf_bodies(&self) -> Vec<BasicBody> {
        match self.node().kind {
            NodeKind::Leaf { head, .. } => self.tree.bucket(head).collect(),
            _ => Vec::new(),
        }
    }

    /// Every body stored anywhere in this node's subtree
    pub fn subtree_bodies(&self) -> Vec<BasicBody> {
        let mut out = Vec::new();
        let mut stack = vec![self.index];
        while let Some(index) = stack.pop() {
            match self.tree.nodes[index].kind {
                NodeKind::Empty => {}
                NodeKind::Leaf { head, .. } => out.extend(self.tree.bucket(head)),
                NodeKind::Internal { first_child } => stack.extend(first_child..first_child + 4),
            }
        }
        out
    }
}

/// Arena-backed Barnes-Hut quad-tree
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<Node>,
    slots: Vec<Slot>,
    max_depth: usize,
    depth_reached: usize,
    merged_leaves: usize,
    stats: ArenaStats,
}

impl QuadTree {
    /// Create an empty tree that subdivides at most `max_depth` levels
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` is zero
    pub fn new(max_depth: usize) -> Self {
        assert!(max_depth > 0, "Tree depth limit must be at least 1");
        QuadTree {
            nodes: Vec::new(),
            slots: Vec::new(),
            max_depth,
            depth_reached: 0,
            merged_leaves: 0,
            stats: ArenaStats::default(),
        }
    }

    /// Create an empty tree with room for `bodies` bodies
    pub fn with_capacity(bodies: usize, max_depth: usize) -> Self {
        let mut tree = QuadTree::new(max_depth);
        tree.slots.reserve(bodies);
        // A uniform population needs a little over one node per body
        tree.nodes.reserve(bodies * 2 + 1);
        tree
    }

    /// Build a fresh tree over `bodies`
    pub fn build(bodies: &[BasicBody], boundary: Boundary, max_depth: usize) -> Result<Self> {
        let mut tree = QuadTree::with_capacity(bodies.len(), max_depth);
        tree.rebuild(bodies, boundary)?;
        Ok(tree)
    }

    /// Discard the current contents and start over with an empty root
    pub fn reset(&mut self, boundary: Boundary) {
        self.nodes.clear();
        self.slots.clear();
        self.depth_reached = 0;
        self.merged_leaves = 0;
        self.nodes.push(Node::empty(boundary, 0));
    }

    /// Reset to `boundary` and insert every body in order, reusing the arena
    pub fn rebuild(&mut self, bodies: &[BasicBody], boundary: Boundary) -> Result<()> {
        let capacity_before = self.nodes.capacity();
        self.reset(boundary);
        for body in bodies {
            self.insert(*body)?;
        }

        self.stats.rebuilds += 1;
        if self.nodes.capacity() > capacity_before {
            self.stats.growths += 1;
            log::debug!(
                "QuadTree: node arena grew from {} to {} nodes",
                capacity_before,
                self.nodes.capacity()
            );
        } else {
            self.stats.reuses += 1;
        }
        self.stats.peak_nodes = self.stats.peak_nodes.max(self.nodes.len());
        Ok(())
    }

    /// Insert one body
    ///
    /// Fails with [`PhysicsError::OutOfBounds`] if the body lies outside the
    /// root boundary; the tree is left unchanged in that case.
    pub fn insert(&mut self, body: BasicBody) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(out_of_bounds(&body));
        }
        if !self.nodes[ROOT].boundary.contains(&body.position) {
            return Err(out_of_bounds(&body));
        }

        let slot = self.slots.len();
        self.slots.push(Slot { body, next: None });
        self.insert_at(ROOT, slot)
    }

    fn insert_at(&mut self, index: usize, slot: usize) -> Result<()> {
        let body = self.slots[slot].body;
        if !self.nodes[index].boundary.contains(&body.position) {
            return Err(out_of_bounds(&body));
        }

        match self.nodes[index].kind {
            NodeKind::Empty => {
                self.slots[slot].next = None;
                self.nodes[index].kind = NodeKind::Leaf { head: slot, count: 1 };
                self.depth_reached = self.depth_reached.max(self.nodes[index].depth);
            }
            NodeKind::Leaf { head, count } => {
                if self.nodes[index].depth >= self.max_depth {
                    // Splitting further cannot separate these bodies in f64
                    if count == 1 {
                        self.merged_leaves += 1;
                        log::warn!(
                            "QuadTree: depth limit {} reached at ({:e}, {:e}); sharing a leaf between {} and {}",
                            self.max_depth,
                            body.position.x(),
                            body.position.y(),
                            self.slots[head].body.id,
                            body.id
                        );
                    }
                    self.slots[slot].next = Some(head);
                    self.nodes[index].kind = NodeKind::Leaf { head: slot, count: count + 1 };
                } else {
                    let first_child = self.subdivide(index);
                    let mut cursor = Some(head);
                    while let Some(resident) = cursor {
                        cursor = self.slots[resident].next;
                        self.insert_into_child(index, first_child, resident)?;
                    }
                    self.insert_into_child(index, first_child, slot)?;
                }
            }
            NodeKind::Internal { first_child } => {
                self.insert_into_child(index, first_child, slot)?;
            }
        }

        self.update_center_of_mass(index);
        Ok(())
    }

    fn insert_into_child(&mut self, index: usize, first_child: usize, slot: usize) -> Result<()> {
        let quadrant = self.nodes[index]
            .boundary
            .quadrant_index(&self.slots[slot].body.position);
        self.insert_at(first_child + quadrant, slot)
    }

    fn subdivide(&mut self, index: usize) -> usize {
        let boundary = self.nodes[index].boundary;
        let depth = self.nodes[index].depth + 1;
        let first_child = self.nodes.len();
        for quadrant in 0..4 {
            self.nodes.push(Node::empty(boundary.quadrant(quadrant), depth));
        }
        self.nodes[index].kind = NodeKind::Internal { first_child };
        first_child
    }

    fn update_center_of_mass(&mut self, index: usize) {
        let (mass, center_of_mass) = match self.nodes[index].kind {
            NodeKind::Empty => (0.0, Position::zero()),
            NodeKind::Leaf { head, count: 1 } => {
                let body = self.slots[head].body;
                (body.mass, body.position)
            }
            NodeKind::Leaf { head, .. } => {
                weighted_average(self.bucket(head).map(|b| (b.mass, b.position)))
            }
            NodeKind::Internal { first_child } => weighted_average(
                self.nodes[first_child..first_child + 4]
                    .iter()
                    .filter(|child| child.mass > 0.0)
                    .map(|child| (child.mass, child.center_of_mass)),
            ),
        };

        let node = &mut self.nodes[index];
        node.mass = mass;
        node.center_of_mass = center_of_mass;
    }

    fn bucket(&self, head: usize) -> impl Iterator<Item = BasicBody> + '_ {
        std::iter::successors(Some(head), move |&slot| self.slots[slot].next)
            .map(move |slot| self.slots[slot].body)
    }

    /// Approximate net gravitational force on `target`
    ///
    /// Self-interaction is excluded by comparing handles, so a different body
    /// with the same mass and position still attracts the target.
    pub fn calculate_force(&self, target: &BasicBody, gravity: &Gravity, theta: f64) -> Force {
        if self.nodes.is_empty() {
            return Force::zero();
        }
        self.force_from(ROOT, target, gravity, theta)
    }

    fn force_from(&self, index: usize, target: &BasicBody, gravity: &Gravity, theta: f64) -> Force {
        let node = &self.nodes[index];
        if node.mass == 0.0 {
            return Force::zero();
        }

        match node.kind {
            NodeKind::Empty => Force::zero(),
            NodeKind::Leaf { head, .. } => {
                let mut total = Force::zero();
                for body in self.bucket(head) {
                    if body.id != target.id {
                        total += gravity.force_between(target, &body.position, body.mass);
                    }
                }
                total
            }
            NodeKind::Internal { first_child } => {
                let softened_distance =
                    gravity.softened_distance(&target.position, &node.center_of_mass);
                let cutoff = node.boundary.extent() / softened_distance;

                if cutoff < theta {
                    gravity.force_between(target, &node.center_of_mass, node.mass)
                } else {
                    let mut total = Force::zero();
                    for child in first_child..first_child + 4 {
                        total += self.force_from(child, target, gravity, theta);
                    }
                    total
                }
            }
        }
    }

    /// Root node, if the tree has been reset or built
    pub fn root(&self) -> Option<NodeView<'_>> {
        self.node(ROOT)
    }

    /// Node at an arena index
    pub fn node(&self, index: usize) -> Option<NodeView<'_>> {
        (index < self.nodes.len()).then_some(NodeView { tree: self, index })
    }

    /// All nodes in arena order
    pub fn nodes(&self) -> impl Iterator<Item = NodeView<'_>> {
        (0..self.nodes.len()).map(move |index| NodeView { tree: self, index })
    }

    /// Number of nodes currently in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of bodies inserted since the last reset
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no body has been inserted since the last reset
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Configured depth limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Deepest level at which a body was stored
    pub fn depth_reached(&self) -> usize {
        self.depth_reached
    }

    /// Number of leaves holding more than one body
    pub fn merged_leaf_count(&self) -> usize {
        self.merged_leaves
    }

    /// Arena reuse statistics
    pub fn stats(&self) -> ArenaStats {
        self.stats.clone()
    }
}

fn weighted_average(items: impl Iterator<Item = (f64, Position)>) -> (f64, Position) {
    let mut total_mass = 0.0;
    let mut weighted_x = 0.0;
    let mut weighted_y = 0.0;
    for (mass, position) in items {
        total_mass += mass;
        weighted_x += position.x() * mass;
        weighted_y += position.y() * mass;
    }

    if total_mass > 0.0 {
        (total_mass, Position::new(weighted_x / total_mass, weighted_y / total_mass))
    } else {
        (0.0, Position::zero())
    }
}

fn out_of_bounds(body: &BasicBody) -> PhysicsError {
    PhysicsError::OutOfBounds {
        body: body.id,
        x: body.position.x(),
        y: body.position.y(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyId;

    fn body(id: u64, mass: f64, x: f64, y: f64) -> BasicBody {
        BasicBody::new(BodyId::new(id), mass, Position::new(x, y))
    }

    fn unit_box() -> Boundary {
        Boundary::new(0.0, 0.0, 4.0, 4.0)
    }

    #[test]
    fn test_single_insert_makes_leaf() {
        let tree = QuadTree::build(&[body(0, 2.0, 1.0, 3.0)], unit_box(), 8).unwrap();
        let root = tree.root().unwrap();

        assert!(root.is_leaf());
        assert_eq!(root.mass(), 2.0);
        assert_eq!(root.center_of_mass(), Position::new(1.0, 3.0));
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_second_insert_subdivides() {
        let bodies = [body(0, 1.0, 1.0, 1.0), body(1, 3.0, 3.0, 3.0)];
        let tree = QuadTree::build(&bodies, unit_box(), 8).unwrap();
        let root = tree.root().unwrap();

        assert!(!root.is_leaf());
        assert!(root.leaf_bodies().is_empty());
        assert_eq!(tree.node_count(), 5);
        assert_eq!(root.mass(), 4.0);
        assert_eq!(root.center_of_mass(), Position::new(2.5, 2.5));

        let children = root.children().unwrap();
        assert_eq!(children[0].leaf_bodies(), vec![bodies[0]]);
        assert_eq!(children[3].leaf_bodies(), vec![bodies[1]]);
        assert_eq!(children[1].mass(), 0.0);
        assert_eq!(children[2].mass(), 0.0);
        assert_eq!(children[0].depth(), 1);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut tree = QuadTree::new(8);
        tree.reset(unit_box());
        let err = tree.insert(body(5, 1.0, 5.0, 1.0)).unwrap_err();
        assert_eq!(err, PhysicsError::OutOfBounds { body: BodyId::new(5), x: 5.0, y: 1.0 });
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_without_root_rejected() {
        let mut tree = QuadTree::new(8);
        assert!(tree.insert(body(0, 1.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_coincident_bodies_share_leaf_at_depth_limit() {
        let bodies = [
            body(0, 1.0, 1.0, 1.0),
            body(1, 2.0, 1.0, 1.0),
            body(2, 3.0, 1.0, 1.0),
        ];
        let tree = QuadTree::build(&bodies, unit_box(), 6).unwrap();

        assert_eq!(tree.depth_reached(), 6);
        assert_eq!(tree.merged_leaf_count(), 1);
        assert_eq!(tree.root().unwrap().mass(), 6.0);

        let leaf = tree
            .nodes()
            .find(|n| n.leaf_bodies().len() == 3)
            .expect("coincident bodies should share one leaf");
        assert_eq!(leaf.depth(), 6);
        assert_eq!(leaf.center_of_mass(), Position::new(1.0, 1.0));
    }

    #[test]
    fn test_self_force_excluded_by_handle() {
        let gravity = Gravity::new(1.0, 0.01);
        let lone = body(0, 1.0, 2.0, 2.0);
        let tree = QuadTree::build(&[lone], unit_box(), 8).unwrap();
        assert_eq!(tree.calculate_force(&lone, &gravity, 0.5), Force::zero());
    }

    #[test]
    fn test_identical_twins_are_distinct() {
        let gravity = Gravity::new(1.0, 0.01);
        let a = body(0, 1.0, 1.0, 1.0);
        let b = body(1, 1.0, 1.0, 1.0);
        let c = body(2, 1.0, 3.0, 1.0);
        let tree = QuadTree::build(&[a, b, c], unit_box(), 4).unwrap();

        // Only c pulls on a; b is coincident and contributes a zero vector
        let expected = gravity.pair_force(&a, &c) + gravity.pair_force(&a, &b);
        assert_eq!(tree.calculate_force(&a, &gravity, 0.0), expected);
        assert!(tree.calculate_force(&a, &gravity, 0.0).fx > 0.0);
    }

    #[test]
    fn test_theta_zero_matches_pairwise_sum() {
        let gravity = Gravity::new(1.0, 0.05);
        let bodies = [
            body(0, 1.0, 0.5, 0.5),
            body(1, 2.0, 3.5, 0.5),
            body(2, 1.5, 0.5, 3.5),
            body(3, 0.5, 3.0, 3.0),
            body(4, 1.0, 2.1, 1.9),
        ];
        let tree = QuadTree::build(&bodies, unit_box(), 16).unwrap();

        for target in &bodies {
            let mut expected = Force::zero();
            for other in bodies.iter().filter(|b| b.id != target.id) {
                expected += gravity.pair_force(target, other);
            }
            let approx = tree.calculate_force(target, &gravity, 0.0);
            assert!((approx - expected).magnitude() <= 1e-12 * expected.magnitude());
        }
    }

    #[test]
    fn test_large_theta_uses_point_mass() {
        let gravity = Gravity::new(1.0, 0.0);
        let cluster = [body(1, 1.0, 3.5, 3.5), body(2, 1.0, 3.75, 3.75)];
        let target = body(0, 1.0, -100.0, -100.0);
        let boundary = Boundary::new(-100.0, -100.0, 4.0, 4.0);

        let mut all = vec![target];
        all.extend_from_slice(&cluster);
        let tree = QuadTree::build(&all, boundary, 16).unwrap();

        // θ = 1 opens the root (cutoff ≈ 1.06) but not the distant cluster node (≈ 0.35)
        let approx = tree.calculate_force(&target, &gravity, 1.0);
        let exact = tree.calculate_force(&target, &gravity, 0.0);
        assert!(approx.fx > 0.0 && approx.fy > 0.0);
        assert_ne!(approx, exact);
        assert!((approx - exact).magnitude() < 1e-3 * exact.magnitude());
    }

    #[test]
    fn test_mass_invariant_holds_for_every_node() {
        let bodies: Vec<BasicBody> = (0..40)
            .map(|i| {
                let t = i as f64;
                body(i, 1.0 + (i % 3) as f64, (t * 0.37) % 4.0, (t * 0.91) % 4.0)
            })
            .collect();
        let tree = QuadTree::build(&bodies, unit_box(), 32).unwrap();

        for node in tree.nodes() {
            let stored = node.subtree_bodies();
            let expected: f64 = stored.iter().map(|b| b.mass).sum();
            assert!((node.mass() - expected).abs() <= 1e-12 * expected.max(1.0));
            for b in &stored {
                assert!(node.boundary().contains(&b.position));
            }
        }
        assert_eq!(tree.root().unwrap().subtree_bodies().len(), bodies.len());
    }

    #[test]
    fn test_rebuild_reuses_arena() {
        let bodies: Vec<BasicBody> = (0..16).map(|i| body(i, 1.0, (i % 4) as f64, (i / 4) as f64)).collect();
        let mut tree = QuadTree::new(16);
        tree.rebuild(&bodies, Boundary::new(-0.5, -0.5, 3.5, 3.5)).unwrap();
        let nodes_first = tree.node_count();
        tree.rebuild(&bodies, Boundary::new(-0.5, -0.5, 3.5, 3.5)).unwrap();
        tree.rebuild(&bodies, Boundary::new(-0.5, -0.5, 3.5, 3.5)).unwrap();

        let stats = tree.stats();
        assert_eq!(tree.node_count(), nodes_first);
        assert_eq!(stats.rebuilds, 3);
        assert_eq!(stats.growths, 1);
        assert_eq!(stats.reuses, 2);
        assert_eq!(stats.peak_nodes, nodes_first);
        assert!(stats.reuse_rate() > 66.0);
    }

    #[test]
    #[should_panic(expected = "Tree depth limit must be at least 1")]
    fn test_zero_depth_panics() {
        QuadTree::new(0);
    }
}
