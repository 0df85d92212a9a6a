use std::borrow::Borrow;
use std::fmt;

/// A graph node: an immutable label and nothing else.
///
/// Equality, ordering, and hashing all come from the label, so two nodes
/// built from equal labels are the same node. Because `GraphNode<L>:
/// Borrow<L>`, every label-keyed lookup on a graph accepts either `&L` or
/// `&GraphNode<L>`.
///
/// The distance/predecessor fields a shortest-path run needs are not stored
/// here; the computer keeps them in arrays keyed by node index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphNode<L> {
    label: L,
}

impl<L> GraphNode<L> {
    /// Wrap `label` in a node.
    #[must_use]
    pub const fn new(label: L) -> Self {
        Self { label }
    }

    /// The node's label.
    #[must_use]
    pub const fn label(&self) -> &L {
        &self.label
    }

    /// Unwrap the node into its label.
    #[must_use]
    pub fn into_label(self) -> L {
        self.label
    }
}

impl<L> From<L> for GraphNode<L> {
    fn from(label: L) -> Self {
        Self::new(label)
    }
}

impl<L> Borrow<L> for GraphNode<L> {
    fn borrow(&self) -> &L {
        &self.label
    }
}

impl<L: fmt::Display> fmt::Display for GraphNode<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::GraphNode;
    use std::collections::HashMap;

    #[test]
    fn equal_labels_are_the_same_node() {
        assert_eq!(GraphNode::new("A"), GraphNode::new("A"));
        assert_ne!(GraphNode::new("A"), GraphNode::new("B"));
    }

    #[test]
    fn map_keyed_by_node_accepts_label_lookups() {
        let mut index: HashMap<GraphNode<String>, usize> = HashMap::new();
        index.insert(GraphNode::new("depot".to_string()), 3);

        assert_eq!(index.get(&"depot".to_string()), Some(&3));
        assert_eq!(index.get(&GraphNode::new("depot".to_string())), Some(&3));
    }

    #[test]
    fn display_shows_the_label() {
        assert_eq!(GraphNode::new(42).to_string(), "42");
    }
}
