//! MCTS tree node representation.
//!
//! Each node holds the position reached by playing its move from the parent,
//! together with the visit statistics used for best-child selection.

use engine_core::Position;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeNode<P: Position> {
    /// Parent node index (NONE for root). Never an ownership edge.
    pub parent: NodeId,

    /// Position at this node
    pub position: P,

    /// Whether the game is over here (computed once at construction)
    pub is_terminal: bool,

    /// True once every legal move has a child, or from the start if terminal
    pub is_fully_expanded: bool,

    /// Number of rounds whose leaf was this node or a descendant
    pub visit_count: u32,

    /// Sum of sign-adjusted evaluations backpropagated through this node.
    /// Expressed from the perspective of the player who moved into it.
    pub total_reward: f64,

    /// Children keyed by move, in expansion order.
    pub children: Vec<(P::Move, NodeId)>,
}

impl<P: Position> TreeNode<P> {
    /// Create a new root node.
    pub fn new_root(position: P) -> Self {
        Self::new(NodeId::NONE, position)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, position: P) -> Self {
        Self::new(parent, position)
    }

    fn new(parent: NodeId, position: P) -> Self {
        let is_terminal = position.is_terminal();
        Self {
            parent,
            position,
            is_terminal,
            is_fully_expanded: is_terminal,
            visit_count: 0,
            total_reward: 0.0,
            children: Vec::new(),
        }
    }

    /// Mean reward `total_reward / visit_count`.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_reward / self.visit_count as f64
        }
    }

    /// Score used by the best-child policy.
    ///
    /// `mean_reward + c * sqrt(2 * ln(N_parent) / N)`. The mean reward is
    /// already from the selecting parent's point of view because of the
    /// alternating sign applied during backpropagation, so no flip happens
    /// here.
    ///
    /// Takes pre-computed `ln(N_parent)` to avoid redundant work when
    /// comparing siblings. Only called on visited nodes.
    #[inline]
    pub fn selection_score(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        let exploitation = self.mean_reward();
        if exploration == 0.0 {
            return exploitation;
        }
        exploitation + exploration * (2.0 * parent_visits_ln / self.visit_count as f64).sqrt()
    }

    /// Child reached by `mv`, if it has been expanded.
    pub fn child(&self, mv: P::Move) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(child_move, _)| *child_move == mv)
            .map(|(_, id)| *id)
    }

    /// Whether `mv` already has a child.
    #[inline]
    pub fn has_child(&self, mv: P::Move) -> bool {
        self.child(mv).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ToyPosition;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = TreeNode::new_root(ToyPosition::new(2, 3));

        assert!(node.parent.is_none());
        assert_eq!(node.visit_count, 0);
        assert!(!node.is_terminal);
        assert!(!node.is_fully_expanded);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_terminal_node_starts_fully_expanded() {
        let node = TreeNode::new_root(ToyPosition::new(0, 3));
        assert!(node.is_terminal);
        assert!(node.is_fully_expanded);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_mean_reward() {
        let mut node = TreeNode::new_root(ToyPosition::new(1, 2));

        // Unvisited
        assert!(node.mean_reward().abs() < 1e-12);

        // After visits
        node.visit_count = 4;
        node.total_reward = 2.0;
        assert!((node.mean_reward() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_selection_score() {
        let mut node = TreeNode::new_root(ToyPosition::new(1, 2));
        node.visit_count = 10;
        node.total_reward = 5.0;

        let parent_visits_ln = (100f64).ln();

        // 0.5 + 1.0 * sqrt(2 * ln(100) / 10) = 0.5 + 0.9597...
        let score = node.selection_score(parent_visits_ln, 1.0);
        assert!((score - 1.4597).abs() < 1e-3);

        // Zero exploration is pure exploitation
        let greedy = node.selection_score(parent_visits_ln, 0.0);
        assert!((greedy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_child_lookup() {
        let mut node = TreeNode::new_root(ToyPosition::new(1, 3));
        node.children.push((2, NodeId(5)));

        assert_eq!(node.child(2), Some(NodeId(5)));
        assert!(node.has_child(2));
        assert!(!node.has_child(0));
    }
}
