//! Dijkstra single-source shortest paths.
//!
//! # Overview
//!
//! A [`DijkstraShortestPathComputer`] owns a directed graph whose edges all
//! carry non-negative weights. [`compute_shortest_paths_from`] fixes a source
//! and computes, for every node, its distance from the source and the
//! predecessor on one shortest path. Queries afterwards walk those
//! predecessor links.
//!
//! # Algorithm
//!
//! 1. Every node gets a slot holding its tentative distance: `0` for the
//!    source, `+∞` for every other node.
//! 2. All slots go into a fresh [`BinaryHeapMinPriorityQueue`] keyed by
//!    distance.
//! 3. Repeatedly extract the nearest slot `u`. For each edge `u → v` whose
//!    target is still queued, if `dist(u) + w(u, v) < dist(v)` then `u`
//!    becomes `v`'s predecessor and `v`'s priority is decreased in place
//!    through its handle.
//! 4. When the queue is empty every distance is final.
//!
//! Unreachable nodes keep `+∞` and no predecessor.
//!
//! # Run state
//!
//! Distances and predecessors live in arrays indexed by node index, not on
//! the nodes. Node indices shift when a node is removed, so taking the graph
//! through [`graph_mut`] discards the computed run and the computer returns to
//! the uncomputed state.
//!
//! [`compute_shortest_paths_from`]: DijkstraShortestPathComputer::compute_shortest_paths_from
//! [`graph_mut`]: DijkstraShortestPathComputer::graph_mut

use std::borrow::Borrow;
use std::cell::Cell;
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, instrument, warn};
use wayfind_core::config::ShortestPathConfig;
use wayfind_core::error::{ErrorCode, ErrorKind};
use wayfind_core::graph::{Graph, GraphEdge, GraphError, GraphNode};
use wayfind_core::queue::{BinaryHeapMinPriorityQueue, PriorityQueueElement, QueueError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from building a computer or querying its results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    /// The graph offered at construction is empty, undirected, or has an
    /// unweighted or negatively weighted edge.
    #[error("graph is not usable for shortest paths: {0}")]
    InvalidGraph(String),

    /// A source or target that is not a node of the graph.
    #[error("node is not a member of the graph: {0}")]
    NodeNotInGraph(String),

    /// A query was made before any successful run.
    #[error("shortest paths have not been computed")]
    NotComputed,

    /// The graph stopped satisfying the run preconditions after construction.
    #[error("graph no longer satisfies shortest-path preconditions: {0}")]
    GraphChanged(String),

    /// The computed run does not line up with the graph it was read against.
    #[error("computed paths do not match the current graph: {0}")]
    StaleRun(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl PathError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidGraph(_) => ErrorCode::InvalidGraph,
            Self::NodeNotInGraph(_) => ErrorCode::NodeNotInGraph,
            Self::NotComputed => ErrorCode::NotComputed,
            Self::GraphChanged(_) => ErrorCode::GraphChanged,
            Self::StaleRun(_) => ErrorCode::StaleRun,
            Self::Graph(err) => err.code(),
            Self::Queue(err) => err.code(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code().kind()
    }
}

// ---------------------------------------------------------------------------
// Computer
// ---------------------------------------------------------------------------

/// Result of the last successful run, indexed by node index.
struct ComputedRun<L> {
    source: GraphNode<L>,
    source_index: usize,
    distances: Vec<f64>,
    predecessors: Vec<Option<usize>>,
}

/// Single-source shortest-path computer over a non-negatively weighted
/// directed graph.
///
/// ```rust
/// use wayfind_core::AdjacencyMatrixGraph;
/// use wayfind_paths::DijkstraShortestPathComputer;
///
/// let mut graph = AdjacencyMatrixGraph::new();
/// for label in ["A", "B", "C"] {
///     graph.add_node(label);
/// }
/// graph.add_weighted_edge(&"A", &"B", 1.0)?;
/// graph.add_weighted_edge(&"B", &"C", 2.0)?;
/// graph.add_weighted_edge(&"A", &"C", 10.0)?;
///
/// let mut computer = DijkstraShortestPathComputer::new(graph)?;
/// computer.compute_shortest_paths_from(&"A")?;
///
/// assert_eq!(computer.distance_to(&"C")?, 3.0);
/// let hops: Vec<String> = computer
///     .shortest_path_to(&"C")?
///     .unwrap_or_default()
///     .iter()
///     .map(ToString::to_string)
///     .collect();
/// assert_eq!(hops, ["A -> B (1)", "B -> C (2)"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DijkstraShortestPathComputer<G: Graph> {
    graph: G,
    config: ShortestPathConfig,
    run: Option<ComputedRun<G::Label>>,
}

impl<G> DijkstraShortestPathComputer<G>
where
    G: Graph,
    G::Label: Clone + Eq + Hash + Debug,
{
    /// Bind a computer to `graph` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidGraph`] if the graph is empty, not
    /// directed, or has an edge that is unweighted or negatively weighted.
    pub fn new(graph: G) -> Result<Self, PathError> {
        Self::with_config(graph, ShortestPathConfig::default())
    }

    /// Bind a computer to `graph`.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    #[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn with_config(graph: G, config: ShortestPathConfig) -> Result<Self, PathError> {
        if let Err(reason) = check_structure(&graph) {
            warn!(%reason, "graph rejected");
            return Err(PathError::InvalidGraph(reason));
        }
        Ok(Self {
            graph,
            config,
            run: None,
        })
    }

    /// Compute distances and predecessors from `source`, replacing any
    /// previous run.
    ///
    /// With `revalidate_on_run` set, every construction-time precondition is
    /// checked again; otherwise only edge weights are.
    ///
    /// # Errors
    ///
    /// - [`PathError::NodeNotInGraph`] if `source` is not a node.
    /// - [`PathError::GraphChanged`] if the graph no longer satisfies the
    ///   preconditions, e.g. an edge weight was set negative after
    ///   construction.
    #[instrument(skip_all, fields(source = ?source))]
    pub fn compute_shortest_paths_from<Q>(&mut self, source: &Q) -> Result<(), PathError>
    where
        GraphNode<G::Label>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let source_index = self
            .graph
            .index_of(source)
            .map_err(|_| PathError::NodeNotInGraph(format!("{source:?}")))?;

        let precondition = if self.config.revalidate_on_run {
            check_structure(&self.graph)
        } else {
            check_weights(&self.graph)
        };
        if let Err(reason) = precondition {
            warn!(%reason, "run refused");
            return Err(PathError::GraphChanged(reason));
        }

        let node_count = self.graph.node_count();
        let slots: Vec<NodeSlot> = (0..node_count)
            .map(|index| {
                let distance = if index == source_index { 0.0 } else { f64::INFINITY };
                NodeSlot::new(index, distance)
            })
            .collect();
        let mut predecessors = vec![None; node_count];

        let mut queue = BinaryHeapMinPriorityQueue::with_capacity(node_count);
        for slot in &slots {
            queue.insert(slot)?;
        }

        while !queue.is_empty() {
            let nearest = queue.extract_minimum()?;
            let base = nearest.distance();
            for edge in self.graph.edges_of_at(nearest.index)? {
                let target = &slots[self.graph.index_of::<GraphNode<G::Label>>(edge.to())?];
                if !queue.contains(&target) {
                    continue;
                }
                let Some(weight) = edge.weight() else {
                    return Err(PathError::GraphChanged(describe(edge, "has no weight")));
                };
                let candidate = base + weight;
                if candidate < target.distance() {
                    predecessors[target.index] = Some(nearest.index);
                    queue.decrease_priority(&target, candidate)?;
                }
            }
        }

        let distances: Vec<f64> = slots.iter().map(NodeSlot::distance).collect();
        let reached = distances.iter().filter(|d| d.is_finite()).count();
        debug!(reached, node_count, "shortest paths computed");

        self.run = Some(ComputedRun {
            source: self.graph.node_at(source_index)?.clone(),
            source_index,
            distances,
            predecessors,
        });
        Ok(())
    }

    /// Whether a run has completed since construction or the last
    /// [`Self::graph_mut`].
    #[must_use]
    pub const fn is_computed(&self) -> bool {
        self.run.is_some()
    }

    /// Source of the last run.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NotComputed`] if there is no computed run.
    pub fn last_source(&self) -> Result<&GraphNode<G::Label>, PathError> {
        self.run.as_ref().map(|run| &run.source).ok_or(PathError::NotComputed)
    }

    /// Edges of a shortest path from the last source to `target`, in order.
    ///
    /// `Ok(None)` means `target` is unreachable. The path to the source itself
    /// is empty.
    ///
    /// # Errors
    ///
    /// - [`PathError::NodeNotInGraph`] if `target` is not a node. Checked
    ///   before the run state.
    /// - [`PathError::NotComputed`] if there is no computed run.
    pub fn shortest_path_to<Q>(&self, target: &Q) -> Result<Option<Vec<&GraphEdge<G::Label>>>, PathError>
    where
        GraphNode<G::Label>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let (index, run) = self.resolve(target)?;

        let mut path = Vec::new();
        let mut current = index;
        while current != run.source_index {
            let Some(previous) = run.predecessors[current] else {
                return Ok(None);
            };
            let edge = self.graph.edge_at(previous, current)?.ok_or_else(|| {
                PathError::StaleRun(format!("no edge from index {previous} to index {current}"))
            })?;
            path.push(edge);
            if path.len() > run.predecessors.len() {
                return Err(PathError::StaleRun("predecessor links form a cycle".to_string()));
            }
            current = previous;
        }

        path.reverse();
        Ok(Some(path))
    }

    /// Distance from the last source to `target`; `f64::INFINITY` when
    /// unreachable.
    ///
    /// # Errors
    ///
    /// Same as [`Self::shortest_path_to`].
    pub fn distance_to<Q>(&self, target: &Q) -> Result<f64, PathError>
    where
        GraphNode<G::Label>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let (index, run) = self.resolve(target)?;
        Ok(run.distances[index])
    }

    /// The node before `target` on its shortest path; `None` for the source
    /// and for unreachable nodes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::shortest_path_to`].
    pub fn predecessor_of<Q>(&self, target: &Q) -> Result<Option<&GraphNode<G::Label>>, PathError>
    where
        GraphNode<G::Label>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let (index, run) = self.resolve(target)?;
        Ok(run.predecessors[index]
            .map(|previous| self.graph.node_at(previous))
            .transpose()?)
    }

    #[must_use]
    pub const fn graph(&self) -> &G {
        &self.graph
    }

    /// Mutable access to the graph. Discards the computed run.
    pub fn graph_mut(&mut self) -> &mut G {
        if self.run.take().is_some() {
            debug!("computed run discarded for graph mutation");
        }
        &mut self.graph
    }

    /// Give the graph back.
    #[must_use]
    pub fn into_graph(self) -> G {
        self.graph
    }

    #[must_use]
    pub const fn config(&self) -> &ShortestPathConfig {
        &self.config
    }

    fn resolve<Q>(&self, target: &Q) -> Result<(usize, &ComputedRun<G::Label>), PathError>
    where
        GraphNode<G::Label>: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let index = self
            .graph
            .index_of(target)
            .map_err(|_| PathError::NodeNotInGraph(format!("{target:?}")))?;
        let run = self.run.as_ref().ok_or(PathError::NotComputed)?;
        if run.distances.len() != self.graph.node_count() {
            return Err(PathError::StaleRun(format!(
                "run covers {} nodes but the graph has {}",
                run.distances.len(),
                self.graph.node_count()
            )));
        }
        Ok((index, run))
    }
}

impl<G> fmt::Debug for DijkstraShortestPathComputer<G>
where
    G: Graph + Debug,
    G::Label: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DijkstraShortestPathComputer")
            .field("graph", &self.graph)
            .field("config", &self.config)
            .field("last_source", &self.run.as_ref().map(|run| &run.source))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

fn check_structure<G>(graph: &G) -> Result<(), String>
where
    G: Graph,
    G::Label: Debug,
{
    if graph.is_empty() {
        return Err("graph has no nodes".to_string());
    }
    if !graph.is_directed() {
        return Err("graph is not directed".to_string());
    }
    check_weights(graph)
}

fn check_weights<G>(graph: &G) -> Result<(), String>
where
    G: Graph,
    G::Label: Debug,
{
    for edge in graph.edges() {
        match edge.weight() {
            None => return Err(describe(edge, "has no weight")),
            Some(weight) if weight.is_nan() || weight < 0.0 => {
                return Err(describe(edge, &format!("has negative or undefined weight {weight}")));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn describe<L: Debug>(edge: &GraphEdge<L>, problem: &str) -> String {
    format!("edge {:?} -> {:?} {problem}", edge.from().label(), edge.to().label())
}

// ---------------------------------------------------------------------------
// Queue slots
// ---------------------------------------------------------------------------

/// Per-run queue element for one node: its index and tentative distance.
#[derive(Debug)]
struct NodeSlot {
    index: usize,
    distance: Cell<f64>,
    handle: Cell<Option<usize>>,
}

impl NodeSlot {
    const fn new(index: usize, distance: f64) -> Self {
        Self {
            index,
            distance: Cell::new(distance),
            handle: Cell::new(None),
        }
    }

    fn distance(&self) -> f64 {
        self.distance.get()
    }
}

impl PriorityQueueElement for NodeSlot {
    fn priority(&self) -> f64 {
        self.distance.get()
    }

    fn set_priority(&self, priority: f64) {
        self.distance.set(priority);
    }

    fn handle(&self) -> Option<usize> {
        self.handle.get()
    }

    fn set_handle(&self, handle: Option<usize>) {
        self.handle.set(handle);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
