//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Parents own their children through the arena; the parent link stored in
//! each node is a plain index, so there is exactly one owner per node and the
//! whole tree is released at once when the search finishes.

use engine_core::Position;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::node::{NodeId, TreeNode};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<P: Position> {
    /// Arena storing all nodes
    nodes: Vec<TreeNode<P>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<P: Position> MctsTree<P> {
    /// Create a new tree rooted at the given position.
    pub fn new(root_position: P) -> Self {
        Self {
            nodes: vec![TreeNode::new_root(root_position)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &TreeNode<P> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode<P> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: TreeNode<P>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child reached by `mv` to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, mv: P::Move, position: P) -> NodeId {
        let child_id = self.allocate(TreeNode::new_child(parent_id, position));
        self.get_mut(parent_id).children.push((mv, child_id));
        child_id
    }

    /// Move that leads from `parent_id` to `child_id`.
    pub fn move_to(&self, parent_id: NodeId, child_id: NodeId) -> Option<P::Move> {
        self.get(parent_id)
            .children
            .iter()
            .find(|(_, id)| *id == child_id)
            .map(|(mv, _)| *mv)
    }

    /// Pick the child with the highest selection score.
    ///
    /// Ties are broken uniformly at random among all maximizers. Every child
    /// must have been visited at least once, which holds because a child is
    /// evaluated in the same round that creates it.
    pub fn best_child(
        &self,
        node_id: NodeId,
        exploration: f64,
        rng: &mut ChaCha20Rng,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let parent_visits_ln = (node.visit_count as f64).ln();

        let mut best_value = f64::NEG_INFINITY;
        let mut best: Vec<NodeId> = Vec::new();
        for &(_, child_id) in &node.children {
            let value = self
                .get(child_id)
                .selection_score(parent_visits_ln, exploration);
            if value > best_value {
                best_value = value;
                best.clear();
                best.push(child_id);
            } else if value == best_value {
                best.push(child_id);
            }
        }

        best.choose(rng).copied()
    }

    /// Backpropagate an evaluation from a leaf to the root.
    ///
    /// `value` is from the perspective of the side to move at the leaf. The
    /// reward added to the leaf is `-value` and the sign flips at every step
    /// toward the root, so each node accumulates reward for the player who
    /// moved into it.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f64) {
        let mut current_id = leaf_id;
        let mut reward = -value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.total_reward += reward;

            // Opponent's perspective one ply up
            reward = -reward;

            current_id = node.parent;
        }
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_children: root.children.len(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        // Children are always allocated after their parent, so one forward
        // pass over the arena sees every parent depth before its children.
        let mut depths = vec![0u32; self.nodes.len()];
        let mut max_depth = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            if node.parent.is_some() {
                depths[index] = depths[node.parent.0 as usize] + 1;
                max_depth = max_depth.max(depths[index]);
            }
        }
        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_children: usize,
    pub max_depth: u32,
}
