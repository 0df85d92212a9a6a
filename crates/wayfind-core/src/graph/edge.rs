use std::fmt;

use super::node::GraphNode;

/// An edge between two nodes, optionally weighted.
///
/// Equality is endpoint pairing only: the weight never takes part. Directed
/// edges compare `(from, to)` in order; undirected edges compare the
/// unordered pair. A directed edge never equals an undirected one.
#[derive(Debug, Clone)]
pub struct GraphEdge<L> {
    from: GraphNode<L>,
    to: GraphNode<L>,
    directed: bool,
    weight: Option<f64>,
}

impl<L> GraphEdge<L> {
    /// Build an edge from its parts.
    #[must_use]
    pub const fn new(from: GraphNode<L>, to: GraphNode<L>, directed: bool, weight: Option<f64>) -> Self {
        Self {
            from,
            to,
            directed,
            weight,
        }
    }

    /// Unweighted directed edge `from → to`.
    #[must_use]
    pub const fn directed(from: GraphNode<L>, to: GraphNode<L>) -> Self {
        Self::new(from, to, true, None)
    }

    /// Weighted directed edge `from → to`.
    #[must_use]
    pub const fn weighted(from: GraphNode<L>, to: GraphNode<L>, weight: f64) -> Self {
        Self::new(from, to, true, Some(weight))
    }

    /// Unweighted undirected edge between `a` and `b`.
    #[must_use]
    pub const fn undirected(a: GraphNode<L>, b: GraphNode<L>) -> Self {
        Self::new(a, b, false, None)
    }

    #[must_use]
    pub const fn from(&self) -> &GraphNode<L> {
        &self.from
    }

    #[must_use]
    pub const fn to(&self) -> &GraphNode<L> {
        &self.to
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// The weight, or `None` for an unweighted edge.
    #[must_use]
    pub const fn weight(&self) -> Option<f64> {
        self.weight
    }

    #[must_use]
    pub const fn has_weight(&self) -> bool {
        self.weight.is_some()
    }

    /// Replace the weight; `None` makes the edge unweighted.
    pub const fn set_weight(&mut self, weight: Option<f64>) {
        self.weight = weight;
    }
}

impl<L: PartialEq> PartialEq for GraphEdge<L> {
    fn eq(&self, other: &Self) -> bool {
        if self.directed != other.directed {
            return false;
        }
        let same_order = self.from == other.from && self.to == other.to;
        if self.directed {
            same_order
        } else {
            same_order || (self.from == other.to && self.to == other.from)
        }
    }
}

impl<L: Eq> Eq for GraphEdge<L> {}

impl<L: fmt::Display> fmt::Display for GraphEdge<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.directed { "->" } else { "--" };
        write!(f, "{} {arrow} {}", self.from, self.to)?;
        if let Some(weight) = self.weight {
            write!(f, " ({weight})")?;
        }
        Ok(())
    }
}
