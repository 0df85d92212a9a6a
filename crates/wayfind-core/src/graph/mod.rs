//! Directed graph store.
//!
//! # Overview
//!
//! [`AdjacencyMatrixGraph`] keeps its nodes in a label-keyed map from node to
//! integer index and its edges in a square matrix whose cell `[i][j]` holds
//! the edge from the node at index `i` to the node at index `j`, if any.
//!
//! ## Index Contiguity
//!
//! Indices are handed out in insertion order. Removing a node deletes its row
//! and column and decrements every index above it, so the live indices are
//! always exactly `0..node_count()`.
//!
//! ## Three Ways to Name a Node
//!
//! Every query and mutation comes in a label-keyed form (taking `&L` or
//! `&GraphNode<Self::Label>`, which borrow the same way) and an index-keyed `_at` form.
//! Both forms resolve to the same matrix cell and must agree.
//!
//! ```rust
//! use wayfind_core::graph::{AdjacencyMatrixGraph, Graph};
//!
//! let mut graph = AdjacencyMatrixGraph::new();
//! graph.add_node("A");
//! graph.add_node("B");
//! graph.add_weighted_edge(&"A", &"B", 2.0)?;
//!
//! assert_eq!(graph.index_of(&"B")?, 1);
//! assert_eq!(graph.edges_of(&"A")?, graph.edges_of_at(0)?);
//! # Ok::<(), wayfind_core::graph::GraphError>(())
//! ```

pub mod edge;
pub mod matrix;
pub mod node;

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

pub use edge::GraphEdge;
pub use matrix::AdjacencyMatrixGraph;
pub use node::GraphNode;

use crate::error::{ErrorCode, ErrorKind};

/// Errors from graph store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge names an endpoint that is not a node of the graph.
    #[error("edge endpoint is not a node of the graph: {0}")]
    EndpointNotInGraph(String),

    /// An undirected edge was offered to a directed graph.
    #[error("edge is not directed: {0}")]
    UndirectedEdge(String),

    /// No node with this label is in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No matching edge occupies the cell between the two endpoints.
    #[error("edge not found: {0}")]
    EdgeNotFound(String),

    /// An index outside `[0, node_count)`.
    #[error("node index {index} out of range for graph with {node_count} nodes")]
    IndexOutOfBounds { index: usize, node_count: usize },
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EndpointNotInGraph(_) => ErrorCode::EndpointNotInGraph,
            Self::UndirectedEdge(_) => ErrorCode::UndirectedEdge,
            Self::NodeNotFound(_) => ErrorCode::NodeNotFound,
            Self::EdgeNotFound(_) => ErrorCode::EdgeNotFound,
            Self::IndexOutOfBounds { .. } => ErrorCode::NodeIndexOutOfRange,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

/// What a shortest-path computation needs from a graph store.
///
/// Nodes are addressed by index in `[0, node_count)`; `index_of` maps a label
/// (or a node, which borrows as its label) onto that range.
pub trait Graph {
    type Label;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn is_directed(&self) -> bool;

    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// The node currently at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    fn node_at(&self, index: usize) -> Result<&GraphNode<Self::Label>, GraphError>;

    /// Current index of the node with this label.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if no such node is in the graph.
    fn index_of<Q>(&self, key: &Q) -> Result<usize, GraphError>
    where
        GraphNode<Self::Label>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized;

    /// Every edge in the graph.
    fn edges(&self) -> Vec<&GraphEdge<Self::Label>>;

    /// Outgoing edges of the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    fn edges_of_at(&self, index: usize) -> Result<Vec<&GraphEdge<Self::Label>>, GraphError>;

    /// The edge from the node at `from` to the node at `to`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if either index is out of range.
    fn edge_at(&self, from: usize, to: usize) -> Result<Option<&GraphEdge<Self::Label>>, GraphError>;
}
