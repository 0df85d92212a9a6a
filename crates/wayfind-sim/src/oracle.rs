//! Independent checks for a computed shortest-path run.
//!
//! Every check reads the computer through its public API only and compares
//! against facts derived separately: the graph's own index map, and a
//! reference distance table from `petgraph::algo::dijkstra`.

use std::collections::HashMap;

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use wayfind_core::graph::AdjacencyMatrixGraph;
use wayfind_paths::DijkstraShortestPathComputer;

/// Computer type the simulator drives: `u32` labels, matrix store.
pub type SimComputer = DijkstraShortestPathComputer<AdjacencyMatrixGraph<u32>>;

// ── Core result types ─────────────────────────────────────────────────────────

/// Outcome of one or more invariant checks.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleResult {
    /// `true` iff no violations were found.
    pub passed: bool,
    pub violations: Vec<InvariantViolation>,
}

impl OracleResult {
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    fn from_violations(violations: Vec<InvariantViolation>) -> Self {
        Self {
            passed: violations.is_empty(),
            violations,
        }
    }

    /// Merge another result into this one (failures accumulate).
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        if !other.passed {
            self.passed = false;
            self.violations.extend(other.violations);
        }
        self
    }
}

// ── Invariant violation diagnostics ──────────────────────────────────────────

/// Diagnostic information for a single failed invariant check.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// The node at `index` does not map back to `index`.
    IndexContiguity {
        index: usize,
        label: Option<u32>,
        mapped_to: Option<usize>,
    },

    /// Reported distance differs from the reference.
    ///
    /// `expected` is `None` when the reference finds the target unreachable.
    Distance {
        target: u32,
        reported: f64,
        expected: Option<f64>,
    },

    /// A path that is not a contiguous source-to-target walk over current
    /// edges.
    MalformedPath { target: u32, reason: String },

    /// A path whose weights do not add up to the reported distance.
    PathWeight {
        target: u32,
        path_weight: f64,
        distance: f64,
    },

    /// Path presence disagrees with the distance: a finite distance with no
    /// path, or a path to an infinitely distant node.
    Reachability {
        target: u32,
        has_path: bool,
        distance: f64,
    },

    /// Asking for the same path twice gave different answers.
    UnstableQuery { target: u32 },

    /// A query that should succeed on a computed run returned an error.
    QueryFailed { target: u32, error: String },

    /// The computer under check has no computed run.
    NotComputed,
}

// ── Oracle ────────────────────────────────────────────────────────────────────

/// Checks a computed run. Stateless; all methods are associated functions.
pub struct ShortestPathOracle;

impl ShortestPathOracle {
    /// Run every check against a computer that has a computed run.
    #[must_use]
    pub fn check_all(computer: &SimComputer) -> OracleResult {
        Self::check_index_contiguity(computer.graph())
            .merge(Self::check_distances(computer))
            .merge(Self::check_paths(computer))
    }

    /// Every index in `[0, node_count)` holds a node whose label maps back to
    /// that index.
    #[must_use]
    pub fn check_index_contiguity(graph: &AdjacencyMatrixGraph<u32>) -> OracleResult {
        let mut violations = Vec::new();
        for index in 0..graph.node_count() {
            let label = graph.node_at(index).ok().map(|node| *node.label());
            let mapped_to = label.and_then(|label| graph.index_of(&label).ok());
            if mapped_to != Some(index) {
                violations.push(InvariantViolation::IndexContiguity {
                    index,
                    label,
                    mapped_to,
                });
            }
        }
        OracleResult::from_violations(violations)
    }

    /// Reported distances equal a `petgraph` Dijkstra over the same edges.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn check_distances(computer: &SimComputer) -> OracleResult {
        let graph = computer.graph();
        let Ok(source) = computer.last_source() else {
            return OracleResult::from_violations(vec![InvariantViolation::NotComputed]);
        };
        let expected = reference_distances(graph, *source.label());

        let mut violations = Vec::new();
        for node in graph.nodes() {
            let target = *node.label();
            let reported = match computer.distance_to(&target) {
                Ok(distance) => distance,
                Err(err) => {
                    violations.push(InvariantViolation::QueryFailed {
                        target,
                        error: err.to_string(),
                    });
                    continue;
                }
            };
            let want = expected.get(&target).copied();
            let agrees = want.map_or(reported.is_infinite(), |want| reported == want);
            if !agrees {
                violations.push(InvariantViolation::Distance {
                    target,
                    reported,
                    expected: want,
                });
            }
        }
        OracleResult::from_violations(violations)
    }

    /// Every reported path starts at the source, ends at the target, chains
    /// edge to edge over edges the graph holds, weighs exactly the reported
    /// distance, and is returned identically when asked again.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn check_paths(computer: &SimComputer) -> OracleResult {
        let graph = computer.graph();
        let Ok(source) = computer.last_source() else {
            return OracleResult::from_violations(vec![InvariantViolation::NotComputed]);
        };
        let source = *source.label();

        let mut violations = Vec::new();
        for node in graph.nodes() {
            let target = *node.label();
            let (path, distance) = match (computer.shortest_path_to(&target), computer.distance_to(&target)) {
                (Ok(path), Ok(distance)) => (path, distance),
                (Err(err), _) | (_, Err(err)) => {
                    violations.push(InvariantViolation::QueryFailed {
                        target,
                        error: err.to_string(),
                    });
                    continue;
                }
            };

            if computer.shortest_path_to(&target).ok() != Some(path.clone()) {
                violations.push(InvariantViolation::UnstableQuery { target });
            }

            let Some(path) = path else {
                if distance.is_finite() {
                    violations.push(InvariantViolation::Reachability {
                        target,
                        has_path: false,
                        distance,
                    });
                }
                continue;
            };
            if distance.is_infinite() {
                violations.push(InvariantViolation::Reachability {
                    target,
                    has_path: true,
                    distance,
                });
                continue;
            }

            let mut at = source;
            let mut path_weight = 0.0;
            let mut reason = None;
            for edge in &path {
                let (from, to) = (*edge.from().label(), *edge.to().label());
                if from != at {
                    reason = Some(format!("edge {from} -> {to} does not continue from {at}"));
                    break;
                }
                if !matches!(graph.edge_between(&from, &to), Ok(Some(_))) {
                    reason = Some(format!("edge {from} -> {to} is not in the graph"));
                    break;
                }
                path_weight += edge.weight().unwrap_or(f64::NAN);
                at = to;
            }
            if reason.is_none() && at != target {
                reason = Some(format!("path ends at {at}"));
            }

            if let Some(reason) = reason {
                violations.push(InvariantViolation::MalformedPath { target, reason });
            } else if path_weight != distance {
                violations.push(InvariantViolation::PathWeight {
                    target,
                    path_weight,
                    distance,
                });
            }
        }
        OracleResult::from_violations(violations)
    }
}

/// Label-keyed distances from `source`, computed by `petgraph`. Unreachable
/// labels are absent.
fn reference_distances(graph: &AdjacencyMatrixGraph<u32>, source: u32) -> HashMap<u32, f64> {
    let mut reference: DiGraph<u32, f64> = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    let mut ids = HashMap::with_capacity(graph.node_count());
    for node in graph.nodes() {
        ids.insert(*node.label(), reference.add_node(*node.label()));
    }
    for edge in graph.edges() {
        let (Some(&from), Some(&to)) = (ids.get(edge.from().label()), ids.get(edge.to().label())) else {
            continue;
        };
        reference.add_edge(from, to, edge.weight().unwrap_or(f64::NAN));
    }

    let Some(&start) = ids.get(&source) else {
        return HashMap::new();
    };
    dijkstra(&reference, start, None::<NodeIndex>, |e| *e.weight())
        .into_iter()
        .map(|(id, distance)| (reference[id], distance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn computer(edges: &[(u32, u32, f64)], nodes: u32, source: u32) -> SimComputer {
        let mut graph = AdjacencyMatrixGraph::new();
        for label in 0..nodes {
            graph.add_node(label);
        }
        for (from, to, weight) in edges {
            graph.add_weighted_edge(from, to, *weight).expect("endpoints exist");
        }
        let mut computer = SimComputer::new(graph).expect("valid graph");
        computer.compute_shortest_paths_from(&source).expect("source exists");
        computer
    }

    #[test]
    fn correct_run_passes_every_check() {
        let computer = computer(&[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 10.0)], 4, 0);
        let result = ShortestPathOracle::check_all(&computer);
        assert!(result.passed, "violations: {:?}", result.violations);
    }

    #[test]
    fn reference_skips_unreachable_nodes() {
        let computer = computer(&[(0, 1, 4.0)], 3, 0);
        let distances = reference_distances(computer.graph(), 0);
        assert_eq!(distances.get(&1), Some(&4.0));
        assert_eq!(distances.get(&2), None);
    }

    #[test]
    fn uncomputed_run_is_reported() {
        let mut graph = AdjacencyMatrixGraph::new();
        graph.add_node(0_u32);
        let computer = SimComputer::new(graph).expect("valid graph");
        let result = ShortestPathOracle::check_distances(&computer);
        assert_eq!(result.violations, vec![InvariantViolation::NotComputed]);
    }

    #[test]
    fn merge_accumulates_failures() {
        let failing = OracleResult::from_violations(vec![InvariantViolation::UnstableQuery { target: 3 }]);
        let merged = OracleResult::pass().merge(failing).merge(OracleResult::pass());
        assert!(!merged.passed);
        assert_eq!(merged.violations.len(), 1);
    }

    #[test]
    fn contiguity_holds_after_removals() {
        let mut computer = computer(&[(0, 1, 1.0), (2, 3, 1.0)], 5, 0);
        computer.graph_mut().remove_node(&1).expect("node 1 exists");
        computer.graph_mut().remove_node_at(0).expect("index 0 exists");
        assert!(ShortestPathOracle::check_index_contiguity(computer.graph()).passed);
    }
}
