//! MCTS tree node representation.
//!
//! Each node stands for the position reached by playing `action` from the
//! parent. Nodes carry no board; the search replays actions on a copy of the
//! root board while descending.

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
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Cell index played from the parent to reach this node (0 for root)
    pub action: usize,

    /// Prior probability assigned by the evaluator when the parent was expanded.
    pub prior: f32,

    /// Number of backups that passed through this node
    pub visit_count: u32,

    /// Running mean of backed-up values, from the point of view of the
    /// player to move at this node.
    pub action_value: f32,

    /// Children as (action, NodeId) pairs in insertion order.
    /// Empty until node is expanded.
    pub children: Vec<(usize, NodeId)>,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root() -> Self {
        Self {
            parent: NodeId::NONE,
            action: 0,
            prior: 1.0,
            visit_count: 0,
            action_value: 0.0,
            children: Vec::new(),
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: usize, prior: f32) -> Self {
        Self {
            parent,
            action,
            prior,
            visit_count: 0,
            action_value: 0.0,
            children: Vec::new(),
        }
    }

    /// Fold one backed-up value into the running mean.
    #[inline]
    pub fn update(&mut self, value: f32) {
        let n = self.visit_count as f32;
        self.action_value = (self.action_value * n + value) / (n + 1.0);
        self.visit_count += 1;
    }

    /// Selection score of this child as seen from its parent:
    /// `-Q + c_puct * P / (1 + N)`.
    ///
    /// Q is stored for the player to move at this node, which is the
    /// parent's opponent, so the parent ranks children by `-Q`.
    #[inline]
    pub fn selection_score(&self, c_puct: f32) -> f32 {
        let u = c_puct * self.prior / (1.0 + self.visit_count as f32);
        -self.action_value + u
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this is a leaf node (no children yet).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.is_expanded()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Find the child reached by `action`.
    pub fn child(&self, action: usize) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }
}
