//! Random graph mutations followed by a shortest-path run.
//!
//! Indices must stay contiguous through every removal, and every path the
//! computer returns must chain from the source and weigh its distance.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wayfind_core::graph::AdjacencyMatrixGraph;
use wayfind_paths::DijkstraShortestPathComputer;

#[derive(Debug, Arbitrary)]
enum GraphOp {
    AddNode(u8),
    RemoveNode(u8),
    RemoveNodeAt(u8),
    AddEdge { from: u8, to: u8, weight: u8 },
    RemoveEdge { from: u8, to: u8 },
    Reweight { from: u8, to: u8, weight: u8 },
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    ops: Vec<GraphOp>,
    source: u8,
}

fuzz_target!(|input: FuzzInput| {
    if input.ops.len() > 500 {
        return;
    }

    let mut graph = AdjacencyMatrixGraph::new();
    for op in &input.ops {
        match *op {
            GraphOp::AddNode(label) => {
                graph.add_node(label);
            }
            GraphOp::RemoveNode(label) => {
                let _ = graph.remove_node(&label);
            }
            GraphOp::RemoveNodeAt(index) => {
                let _ = graph.remove_node_at(usize::from(index));
            }
            GraphOp::AddEdge { from, to, weight } => {
                let _ = graph.add_weighted_edge(&from, &to, f64::from(weight));
            }
            GraphOp::RemoveEdge { from, to } => {
                let _ = graph.remove_edge_between(&from, &to);
            }
            GraphOp::Reweight { from, to, weight } => {
                let _ = graph.set_edge_weight(&from, &to, Some(f64::from(weight)));
            }
        }

        for index in 0..graph.node_count() {
            let label = *graph.node_at(index).expect("index below node_count").label();
            assert_eq!(graph.index_of(&label).ok(), Some(index), "index map out of sync");
        }
        assert_eq!(graph.edges().len(), graph.edge_count());
    }

    if graph.is_empty() {
        return;
    }
    let source = *graph
        .node_at(usize::from(input.source) % graph.node_count())
        .expect("index below node_count")
        .label();

    let mut computer = DijkstraShortestPathComputer::new(graph).expect("non-negative weights");
    computer.compute_shortest_paths_from(&source).expect("source is a member");

    for node in computer.graph().nodes() {
        let distance = computer.distance_to(node).expect("member");
        let path = computer.shortest_path_to(node).expect("member");
        match path {
            None => assert!(distance.is_infinite()),
            Some(edges) => {
                let mut at = source;
                let mut total = 0.0;
                for edge in edges {
                    assert_eq!(*edge.from().label(), at);
                    total += edge.weight().expect("weighted");
                    at = *edge.to().label();
                }
                assert_eq!(at, *node.label());
                assert!((total - distance).abs() < f64::EPSILON * 64.0 * (1.0 + distance));
            }
        }
    }
});
