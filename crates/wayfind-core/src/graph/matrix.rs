//! Adjacency-matrix directed graph.
//!
//! The matrix is a `Vec` of rows so it can grow by one row and one column per
//! inserted node and shrink by one of each per removed node. A cell is either
//! `None` or the edge object itself, not a presence flag.

#![allow(clippy::module_name_repetitions)]

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use super::{Graph, GraphEdge, GraphError, GraphNode};

/// A directed graph backed by a square adjacency matrix.
///
/// Labels must be unique: adding a node whose label is already present is a
/// no-op that returns `false`.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrixGraph<L> {
    /// Node set, each node mapped to its current index.
    nodes_index: HashMap<GraphNode<L>, usize>,
    /// Nodes in index order; `nodes[nodes_index[n]] == n` for every node.
    nodes: Vec<GraphNode<L>>,
    /// `matrix[i][j]` is the edge from `nodes[i]` to `nodes[j]`, if any.
    matrix: Vec<Vec<Option<GraphEdge<L>>>>,
    /// Number of occupied cells in `matrix`.
    edge_count: usize,
}

impl<L> Default for AdjacencyMatrixGraph<L> {
    fn default() -> Self {
        Self {
            nodes_index: HashMap::new(),
            nodes: Vec::new(),
            matrix: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<L> AdjacencyMatrixGraph<L>
where
    L: Clone + Eq + Hash + Debug,
{
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges currently in the graph. O(1).
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Always `true`: this store only holds directed edges.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        true
    }

    /// Remove every node and edge.
    pub fn clear(&mut self) {
        self.nodes_index.clear();
        self.nodes.clear();
        self.matrix.clear();
        self.edge_count = 0;
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Add a node labelled `label` at index `node_count()`.
    ///
    /// Returns `false` without modifying the graph if the label is already
    /// present.
    pub fn add_node(&mut self, label: L) -> bool {
        self.add_graph_node(GraphNode::new(label))
    }

    /// Add `node` at index `node_count()`, growing the matrix by one row and
    /// one column of empty cells.
    ///
    /// Returns `false` without modifying the graph if an equal node is
    /// already present.
    pub fn add_graph_node(&mut self, node: GraphNode<L>) -> bool {
        if self.nodes_index.contains_key(&node) {
            return false;
        }

        let index = self.nodes.len();
        for row in &mut self.matrix {
            row.push(None);
        }
        self.matrix.push(vec![None; index + 1]);
        self.nodes_index.insert(node.clone(), index);
        self.nodes.push(node);

        trace!(index, "node added");
        true
    }

    /// Remove the node with this label together with every edge touching it.
    ///
    /// Every node whose index was greater than the removed one moves down by
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is not in the graph.
    pub fn remove_node<Q>(&mut self, key: &Q) -> Result<GraphNode<L>, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let index = self.index_of(key)?;
        Ok(self.remove_index(index))
    }

    /// Remove the node at `index`. See [`Self::remove_node`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    pub fn remove_node_at(&mut self, index: usize) -> Result<GraphNode<L>, GraphError> {
        self.check_index(index)?;
        Ok(self.remove_index(index))
    }

    fn remove_index(&mut self, index: usize) -> GraphNode<L> {
        // The row holds outgoing edges (and the self-loop, if any); each
        // remaining row loses one incoming cell.
        let row = self.matrix.remove(index);
        let mut dropped = row.iter().flatten().count();
        for row in &mut self.matrix {
            if row.remove(index).is_some() {
                dropped += 1;
            }
        }
        self.edge_count -= dropped;

        let node = self.nodes.remove(index);
        self.nodes_index.remove(&node);
        for slot in self.nodes_index.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }

        debug!(index, dropped_edges = dropped, "node removed");
        node
    }

    /// The stored node with this label, if present.
    #[must_use]
    pub fn node<Q>(&self, key: &Q) -> Option<&GraphNode<L>>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes_index.get_key_value(key).map(|(node, _)| node)
    }

    #[must_use]
    pub fn contains_node<Q>(&self, key: &Q) -> bool
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes_index.contains_key(key)
    }

    /// The node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    pub fn node_at(&self, index: usize) -> Result<&GraphNode<L>, GraphError> {
        self.check_index(index)?;
        Ok(&self.nodes[index])
    }

    /// Current index of the node with this label.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is not in the graph.
    pub fn index_of<Q>(&self, key: &Q) -> Result<usize, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.nodes_index
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(format!("{key:?}")))
    }

    /// All nodes, in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode<L>> {
        self.nodes.iter()
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Store `edge` in the cell of its endpoints.
    ///
    /// Returns `false` without modifying the graph if that cell is already
    /// occupied; an existing edge must be removed before it can be replaced.
    ///
    /// # Errors
    ///
    /// - [`GraphError::EndpointNotInGraph`] if either endpoint is not a node.
    /// - [`GraphError::UndirectedEdge`] if the edge is not directed.
    pub fn add_edge(&mut self, edge: GraphEdge<L>) -> Result<bool, GraphError> {
        let (from, to) = self.endpoints(edge.from(), edge.to())?;
        if !edge.is_directed() {
            return Err(GraphError::UndirectedEdge(format!(
                "{:?} -- {:?}",
                edge.from().label(),
                edge.to().label()
            )));
        }
        Ok(self.store(from, to, edge))
    }

    /// Add an unweighted edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EndpointNotInGraph`] if either node is missing.
    pub fn add_edge_between<Q>(&mut self, from: &Q, to: &Q) -> Result<bool, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let (from, to) = self.endpoints(from, to)?;
        Ok(self.store_new(from, to, None))
    }

    /// Add a weighted edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EndpointNotInGraph`] if either node is missing.
    pub fn add_weighted_edge<Q>(&mut self, from: &Q, to: &Q, weight: f64) -> Result<bool, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let (from, to) = self.endpoints(from, to)?;
        Ok(self.store_new(from, to, Some(weight)))
    }

    /// Add an unweighted edge between the nodes at `from` and `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if either index is out of range.
    pub fn add_edge_at(&mut self, from: usize, to: usize) -> Result<bool, GraphError> {
        self.check_index(from)?;
        self.check_index(to)?;
        Ok(self.store_new(from, to, None))
    }

    /// Add a weighted edge between the nodes at `from` and `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if either index is out of range.
    pub fn add_weighted_edge_at(&mut self, from: usize, to: usize, weight: f64) -> Result<bool, GraphError> {
        self.check_index(from)?;
        self.check_index(to)?;
        Ok(self.store_new(from, to, Some(weight)))
    }

    fn store_new(&mut self, from: usize, to: usize, weight: Option<f64>) -> bool {
        let edge = GraphEdge::new(self.nodes[from].clone(), self.nodes[to].clone(), true, weight);
        self.store(from, to, edge)
    }

    fn store(&mut self, from: usize, to: usize, edge: GraphEdge<L>) -> bool {
        let cell = &mut self.matrix[from][to];
        if cell.is_some() {
            return false;
        }
        *cell = Some(edge);
        self.edge_count += 1;
        trace!(from, to, "edge added");
        true
    }

    /// Remove `edge` from the graph and return the stored edge.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotFound`] if either endpoint is not a node.
    /// - [`GraphError::EdgeNotFound`] if the cell is empty or holds an edge
    ///   that is not equal to `edge`.
    pub fn remove_edge(&mut self, edge: &GraphEdge<L>) -> Result<GraphEdge<L>, GraphError> {
        let from = self.index_of(edge.from())?;
        let to = self.index_of(edge.to())?;
        let matches = self.matrix[from][to].as_ref().is_some_and(|stored| stored == edge);
        if !matches {
            return Err(GraphError::EdgeNotFound(format!(
                "{:?} -> {:?}",
                edge.from().label(),
                edge.to().label()
            )));
        }
        self.remove_edge_at(from, to)
    }

    /// Remove the edge `from → to`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotFound`] if either endpoint is not a node.
    /// - [`GraphError::EdgeNotFound`] if there is no such edge.
    pub fn remove_edge_between<Q>(&mut self, from: &Q, to: &Q) -> Result<GraphEdge<L>, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        self.remove_edge_at(i, j)
    }

    /// Remove the edge between the nodes at `from` and `to`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::IndexOutOfBounds`] if either index is out of range.
    /// - [`GraphError::EdgeNotFound`] if there is no such edge.
    pub fn remove_edge_at(&mut self, from: usize, to: usize) -> Result<GraphEdge<L>, GraphError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let Some(removed) = self.matrix[from][to].take() else {
            return Err(GraphError::EdgeNotFound(format!(
                "{:?} -> {:?}",
                self.nodes[from].label(),
                self.nodes[to].label()
            )));
        };
        self.edge_count -= 1;
        trace!(from, to, "edge removed");
        Ok(removed)
    }

    /// The stored edge equal to `edge`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if either endpoint is not a node.
    pub fn edge(&self, edge: &GraphEdge<L>) -> Result<Option<&GraphEdge<L>>, GraphError> {
        let from = self.index_of(edge.from())?;
        let to = self.index_of(edge.to())?;
        Ok(self.matrix[from][to].as_ref().filter(|stored| *stored == edge))
    }

    /// The edge `from → to`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if either endpoint is not a node.
    pub fn edge_between<Q>(&self, from: &Q, to: &Q) -> Result<Option<&GraphEdge<L>>, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        Ok(self.matrix[from][to].as_ref())
    }

    /// The edge between the nodes at `from` and `to`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if either index is out of range.
    pub fn edge_at(&self, from: usize, to: usize) -> Result<Option<&GraphEdge<L>>, GraphError> {
        self.check_index(from)?;
        self.check_index(to)?;
        Ok(self.matrix[from][to].as_ref())
    }

    /// Change the weight of the stored edge `from → to`.
    ///
    /// Nothing here validates the weight; a negative weight set after a
    /// shortest-path computer was built is caught when the next run starts.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotFound`] if either endpoint is not a node.
    /// - [`GraphError::EdgeNotFound`] if there is no such edge.
    pub fn set_edge_weight<Q>(&mut self, from: &Q, to: &Q, weight: Option<f64>) -> Result<(), GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        let Some(edge) = self.matrix[i][j].as_mut() else {
            return Err(GraphError::EdgeNotFound(format!("{from:?} -> {to:?}")));
        };
        edge.set_weight(weight);
        Ok(())
    }

    /// Every edge, in row-major index order.
    #[must_use]
    pub fn edges(&self) -> Vec<&GraphEdge<L>> {
        self.matrix.iter().flatten().flatten().collect()
    }

    // -----------------------------------------------------------------------
    // Neighbourhood queries
    // -----------------------------------------------------------------------

    /// Outgoing edges of a node, ordered by target index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is not in the graph.
    pub fn edges_of<Q>(&self, key: &Q) -> Result<Vec<&GraphEdge<L>>, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let index = self.index_of(key)?;
        Ok(self.row(index))
    }

    /// Outgoing edges of the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    pub fn edges_of_at(&self, index: usize) -> Result<Vec<&GraphEdge<L>>, GraphError> {
        self.check_index(index)?;
        Ok(self.row(index))
    }

    /// Incoming edges of a node, ordered by source index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is not in the graph.
    pub fn ingoing_edges_of<Q>(&self, key: &Q) -> Result<Vec<&GraphEdge<L>>, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let index = self.index_of(key)?;
        Ok(self.column(index))
    }

    /// Incoming edges of the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    pub fn ingoing_edges_of_at(&self, index: usize) -> Result<Vec<&GraphEdge<L>>, GraphError> {
        self.check_index(index)?;
        Ok(self.column(index))
    }

    /// Targets of a node's outgoing edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is not in the graph.
    pub fn adjacent_nodes_of<Q>(&self, key: &Q) -> Result<Vec<&GraphNode<L>>, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        Ok(self.edges_of(key)?.into_iter().map(GraphEdge::to).collect())
    }

    /// Targets of the outgoing edges of the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    pub fn adjacent_nodes_of_at(&self, index: usize) -> Result<Vec<&GraphNode<L>>, GraphError> {
        Ok(self.edges_of_at(index)?.into_iter().map(GraphEdge::to).collect())
    }

    /// Sources of a node's incoming edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node is not in the graph.
    pub fn predecessor_nodes_of<Q>(&self, key: &Q) -> Result<Vec<&GraphNode<L>>, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        Ok(self.ingoing_edges_of(key)?.into_iter().map(GraphEdge::from).collect())
    }

    /// Sources of the incoming edges of the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::IndexOutOfBounds`] if `index >= node_count()`.
    pub fn predecessor_nodes_of_at(&self, index: usize) -> Result<Vec<&GraphNode<L>>, GraphError> {
        Ok(self.ingoing_edges_of_at(index)?.into_iter().map(GraphEdge::from).collect())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn row(&self, index: usize) -> Vec<&GraphEdge<L>> {
        self.matrix[index].iter().flatten().collect()
    }

    fn column(&self, index: usize) -> Vec<&GraphEdge<L>> {
        self.matrix.iter().filter_map(|row| row[index].as_ref()).collect()
    }

    fn check_index(&self, index: usize) -> Result<(), GraphError> {
        if index < self.nodes.len() {
            Ok(())
        } else {
            Err(GraphError::IndexOutOfBounds {
                index,
                node_count: self.nodes.len(),
            })
        }
    }

    /// Resolve both endpoints of a prospective edge.
    fn endpoints<Q>(&self, from: &Q, to: &Q) -> Result<(usize, usize), GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let resolve = |key: &Q| {
            self.nodes_index
                .get(key)
                .copied()
                .ok_or_else(|| GraphError::EndpointNotInGraph(format!("{key:?}")))
        };
        Ok((resolve(from)?, resolve(to)?))
    }
}

impl<L> Graph for AdjacencyMatrixGraph<L>
where
    L: Clone + Eq + Hash + Debug,
{
    type Label = L;

    fn node_count(&self) -> usize {
        self.node_count()
    }

    fn edge_count(&self) -> usize {
        self.edge_count()
    }

    fn is_directed(&self) -> bool {
        self.is_directed()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn node_at(&self, index: usize) -> Result<&GraphNode<L>, GraphError> {
        self.node_at(index)
    }

    fn index_of<Q>(&self, key: &Q) -> Result<usize, GraphError>
    where
        GraphNode<L>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.index_of(key)
    }

    fn edges(&self) -> Vec<&GraphEdge<L>> {
        self.edges()
    }

    fn edges_of_at(&self, index: usize) -> Result<Vec<&GraphEdge<L>>, GraphError> {
        self.edges_of_at(index)
    }

    fn edge_at(&self, from: usize, to: usize) -> Result<Option<&GraphEdge<L>>, GraphError> {
        self.edge_at(from, to)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
