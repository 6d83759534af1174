//! MCTS tree structure with arena allocation.
//!
//! Nodes live in a contiguous Vec and refer to each other by NodeId.
//! Parents own their children through the arena; the parent link is only
//! followed upward during backpropagation.

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl Default for MctsTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MctsTree {
    /// Create a tree holding a single unexpanded root.
    pub fn new() -> Self {
        Self {
            nodes: vec![MctsNode::new_root()],
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
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child for `action` under `parent_id`.
    ///
    /// If the parent already has a child for `action`, nothing is allocated
    /// and the existing child's id is returned.
    pub fn add_child(&mut self, parent_id: NodeId, action: usize, prior: f32) -> NodeId {
        if let Some(existing) = self.get(parent_id).child(action) {
            return existing;
        }

        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(MctsNode::new_child(parent_id, action, prior));
        self.get_mut(parent_id).children.push((action, child_id));
        child_id
    }

    /// Expand a node with one child per (action, prior) pair.
    pub fn expand(&mut self, node_id: NodeId, priors: &[(usize, f32)]) {
        for &(action, prior) in priors {
            self.add_child(node_id, action, prior);
        }
    }

    /// Select the child with the highest selection score.
    ///
    /// Ties go to the child inserted first.
    pub fn select_child(&self, node_id: NodeId, c_puct: f32) -> Option<(usize, NodeId)> {
        let mut best: Option<((usize, NodeId), f32)> = None;
        for &(action, child_id) in &self.get(node_id).children {
            let score = self.get(child_id).selection_score(c_puct);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some(((action, child_id), score)),
            }
        }
        best.map(|(choice, _)| choice)
    }

    /// First child (in insertion order) that has never been visited.
    pub fn first_unvisited_child(&self, node_id: NodeId) -> Option<(usize, NodeId)> {
        self.get(node_id)
            .children
            .iter()
            .find(|(_, id)| self.get(*id).visit_count == 0)
            .copied()
    }

    /// Backpropagate a value from a node to the root.
    /// Value is negated at each level (opponent's perspective).
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.update(current_value);
            current_value = -current_value;
            current_id = node.parent;
        }
    }

    /// Visit counts of the root's children in insertion order.
    pub fn root_visit_counts(&self) -> Vec<(usize, u32)> {
        self.get(self.root)
            .children
            .iter()
            .map(|(action, id)| (*action, self.get(*id).visit_count))
            .collect()
    }

    /// Root children's visit counts normalised to probabilities.
    ///
    /// Unvisited children are left out. Empty if the root has no visits below it.
    pub fn root_distribution(&self) -> Vec<(usize, f32)> {
        let counts = self.root_visit_counts();
        let total: u32 = counts.iter().map(|(_, n)| n).sum();
        if total == 0 {
            return Vec::new();
        }

        counts
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(action, n)| (action, n as f32 / total as f32))
            .collect()
    }

    /// Most visited root action as (action, visit_count).
    /// Ties go to the child inserted first.
    pub fn best_action(&self) -> Option<(usize, u32)> {
        self.root_visit_counts()
            .into_iter()
            .fold(None, |best, (action, visits)| match best {
                Some((_, best_visits)) if visits <= best_visits => best,
                _ => Some((action, visits)),
            })
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.action_value,
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree() {
        let tree = MctsTree::new();

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).parent.is_none());
    }

    #[test]
    fn test_add_child() {
        let mut tree = MctsTree::new();

        let child_id = tree.add_child(tree.root(), 4, 0.5);

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(4, NodeId(1))]);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.action, 4);
        assert!((child.prior - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_add_child_existing_action_is_noop() {
        let mut tree = MctsTree::new();

        let first = tree.add_child(tree.root(), 2, 0.3);
        let second = tree.add_child(tree.root(), 2, 0.9);

        assert_eq!(first, second);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(tree.root()).children.len(), 1);
        // First prior is kept
        assert!((tree.get(first).prior - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_expand() {
        let mut tree = MctsTree::new();
        tree.expand(tree.root(), &[(0, 0.2), (5, 0.5), (8, 0.3)]);

        let actions: Vec<usize> = tree
            .get(tree.root())
            .children
            .iter()
            .map(|(a, _)| *a)
            .collect();
        assert_eq!(actions, vec![0, 5, 8]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_backpropagate_two_ply() {
        let mut tree = MctsTree::new();

        // Create a chain: root -> child -> grandchild
        let child_id = tree.add_child(tree.root(), 0, 0.5);
        let grandchild_id = tree.add_child(child_id, 1, 0.5);

        // Terminal leaf: player to move at the grandchild has lost
        tree.backpropagate(grandchild_id, -1.0);

        assert_eq!(tree.get(grandchild_id).visit_count, 1);
        assert_eq!(tree.get(child_id).visit_count, 1);
        assert_eq!(tree.get(tree.root()).visit_count, 1);

        // Negated once per level: depth 2 -> same sign at the root
        assert!((tree.get(grandchild_id).action_value - (-1.0)).abs() < 1e-6);
        assert!((tree.get(child_id).action_value - 1.0).abs() < 1e-6);
        assert!((tree.get(tree.root()).action_value - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_backpropagate_running_mean() {
        let mut tree = MctsTree::new();
        let child_id = tree.add_child(tree.root(), 0, 1.0);

        tree.backpropagate(child_id, 1.0);
        tree.backpropagate(child_id, 0.0);
        tree.backpropagate(child_id, 0.5);

        assert_eq!(tree.get(child_id).visit_count, 3);
        assert!((tree.get(child_id).action_value - 0.5).abs() < 1e-6);
        assert!((tree.get(tree.root()).action_value - (-0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_select_child_prefers_prior_when_unvisited() {
        let mut tree = MctsTree::new();

        tree.add_child(tree.root(), 0, 0.3);
        tree.add_child(tree.root(), 1, 0.7);

        let best = tree.select_child(tree.root(), 1.0).unwrap();
        assert_eq!(best, (1, NodeId(2)));
    }

    #[test]
    fn test_select_child_negates_child_value() {
        let mut tree = MctsTree::new();
        let good = tree.add_child(tree.root(), 0, 0.5);
        let bad = tree.add_child(tree.root(), 1, 0.5);

        // Child 0 is lost for the opponent, child 1 is won for the opponent
        tree.backpropagate(good, -1.0);
        tree.backpropagate(bad, 1.0);

        assert_eq!(tree.select_child(tree.root(), 1.0), Some((0, good)));
    }

    #[test]
    fn test_select_child_ties_go_to_first() {
        let mut tree = MctsTree::new();
        tree.expand(tree.root(), &[(3, 0.25), (1, 0.25), (2, 0.25), (0, 0.25)]);

        assert_eq!(tree.select_child(tree.root(), 5.0), Some((3, NodeId(1))));
        assert_eq!(tree.select_child(NodeId(1), 5.0), None);
    }

    #[test]
    fn test_first_unvisited_child() {
        let mut tree = MctsTree::new();
        tree.expand(tree.root(), &[(0, 0.5), (1, 0.5)]);

        assert_eq!(tree.first_unvisited_child(tree.root()), Some((0, NodeId(1))));
        tree.backpropagate(NodeId(1), 0.0);
        assert_eq!(tree.first_unvisited_child(tree.root()), Some((1, NodeId(2))));
        tree.backpropagate(NodeId(2), 0.0);
        assert_eq!(tree.first_unvisited_child(tree.root()), None);
    }

    #[test]
    fn test_root_distribution() {
        let mut tree = MctsTree::new();

        let c1 = tree.add_child(tree.root(), 0, 0.4);
        let c2 = tree.add_child(tree.root(), 1, 0.4);
        tree.add_child(tree.root(), 2, 0.2);

        tree.get_mut(c1).visit_count = 30;
        tree.get_mut(c2).visit_count = 70;

        assert_eq!(tree.root_visit_counts(), vec![(0, 30), (1, 70), (2, 0)]);

        // Unvisited action 2 is absent
        let dist = tree.root_distribution();
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].0, 0);
        assert!((dist[0].1 - 0.3).abs() < 1e-6);
        assert_eq!(dist[1].0, 1);
        assert!((dist[1].1 - 0.7).abs() < 1e-6);

        assert_eq!(tree.best_action(), Some((1, 70)));
    }

    #[test]
    fn test_root_distribution_without_visits() {
        let mut tree = MctsTree::new();
        assert!(tree.root_distribution().is_empty());
        assert_eq!(tree.best_action(), None);

        tree.add_child(tree.root(), 0, 1.0);
        assert!(tree.root_distribution().is_empty());
    }

    #[test]
    fn test_best_action_ties_go_to_first() {
        let mut tree = MctsTree::new();
        let a = tree.add_child(tree.root(), 6, 0.5);
        let b = tree.add_child(tree.root(), 2, 0.5);
        tree.get_mut(a).visit_count = 5;
        tree.get_mut(b).visit_count = 5;

        assert_eq!(tree.best_action(), Some((6, 5)));
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MctsTree::new();
        let child = tree.add_child(tree.root(), 0, 0.5);
        tree.add_child(child, 1, 1.0);
        tree.backpropagate(child, 0.5);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 3);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.root_visits, 1);
        assert!((stats.root_value - (-0.5)).abs() < 1e-6);
    }
}
