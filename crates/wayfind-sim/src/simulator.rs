//! Single-seed simulation: build, solve, check, mutate, repeat.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use wayfind_core::config::{ShortestPathConfig, SimConfig};
use wayfind_core::graph::AdjacencyMatrixGraph;

use crate::oracle::{OracleResult, ShortestPathOracle, SimComputer};
use crate::rng::DeterministicRng;

/// Parameters for one simulated seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Nodes in the initial graph.
    pub node_count: usize,
    /// Chance, in percent, that an ordered node pair gets an edge.
    pub edge_percent: u8,
    pub max_weight: u32,
    /// Mutate-and-recheck rounds after the initial check.
    pub mutation_rounds: u32,
    pub revalidate_on_run: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::from_sim_config(0, &SimConfig::default(), true)
    }
}

impl SimulationConfig {
    #[must_use]
    pub const fn from_sim_config(seed: u64, sim: &SimConfig, revalidate_on_run: bool) -> Self {
        Self {
            seed,
            node_count: sim.node_count,
            edge_percent: sim.edge_percent,
            max_weight: sim.max_weight,
            mutation_rounds: sim.mutation_rounds,
            revalidate_on_run,
        }
    }
}

/// One graph change applied between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    RemoveNode { label: u32 },
    AddNode { label: u32, edges: usize },
    AddEdge { from: u32, to: u32 },
    Reweight { from: u32, to: u32 },
}

/// What one round computed and what the oracle thought of it.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// `0` is the initial graph; later rounds follow a mutation batch.
    pub round: u32,
    pub mutations: Vec<Mutation>,
    pub source: u32,
    pub node_count: usize,
    pub edge_count: usize,
    /// Nodes at finite distance from `source`, `source` included.
    pub reachable: usize,
    pub oracle: OracleResult,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub seed: u64,
    pub rounds: Vec<RoundReport>,
}

impl SimulationResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.rounds.iter().all(|round| round.oracle.passed)
    }
}

/// Drives one seed. Every random choice comes from a [`DeterministicRng`]
/// seeded from the config, so a seed always replays identically.
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    rng: DeterministicRng,
    next_label: u32,
}

impl Simulator {
    /// # Errors
    ///
    /// Returns an error if the config asks for an empty graph or an edge
    /// percentage above 100.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        if config.node_count == 0 {
            bail!("node_count must be > 0");
        }
        if config.edge_percent > 100 {
            bail!("edge_percent must be <= 100");
        }
        Ok(Self {
            config,
            rng: DeterministicRng::new(config.seed),
            next_label: 0,
        })
    }

    /// Run the initial round and every mutation round.
    ///
    /// Oracle violations are recorded in the result, not returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the computer rejects a graph the simulator built
    /// or a run fails outright.
    #[instrument(skip_all, fields(seed = self.config.seed))]
    pub fn run(&mut self) -> Result<SimulationResult> {
        let graph = self.build_graph()?;
        let mut computer = SimComputer::with_config(
            graph,
            ShortestPathConfig {
                revalidate_on_run: self.config.revalidate_on_run,
            },
        )?;

        let mut rounds = Vec::new();
        rounds.push(self.check_round(0, Vec::new(), &mut computer)?);
        for round in 1..=self.config.mutation_rounds {
            let mutations = self.mutate(computer.graph_mut())?;
            rounds.push(self.check_round(round, mutations, &mut computer)?);
        }

        let result = SimulationResult {
            seed: self.config.seed,
            rounds,
        };
        debug!(passed = result.passed(), "simulation complete");
        Ok(result)
    }

    fn build_graph(&mut self) -> Result<AdjacencyMatrixGraph<u32>> {
        let mut graph = AdjacencyMatrixGraph::new();
        for _ in 0..self.config.node_count {
            let label = self.fresh_label();
            graph.add_node(label);
        }
        let n = graph.node_count();
        for from in 0..n {
            for to in 0..n {
                if self.rng.hit_rate_percent(self.config.edge_percent) {
                    let weight = self.rng.next_weight(self.config.max_weight);
                    graph.add_weighted_edge_at(from, to, weight)?;
                }
            }
        }
        Ok(graph)
    }

    fn check_round(&mut self, round: u32, mutations: Vec<Mutation>, computer: &mut SimComputer) -> Result<RoundReport> {
        let graph = computer.graph();
        let source_index = self.rng.next_index(graph.node_count());
        let source = *graph.node_at(source_index)?.label();

        computer.compute_shortest_paths_from(&source)?;
        let oracle = ShortestPathOracle::check_all(computer);

        let graph = computer.graph();
        let reachable = graph
            .nodes()
            .filter(|node| computer.distance_to(*node).is_ok_and(f64::is_finite))
            .count();

        trace!(round, source, reachable, passed = oracle.passed, "round checked");
        Ok(RoundReport {
            round,
            mutations,
            source,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            reachable,
            oracle,
        })
    }

    /// Apply one to three random changes. Never removes the last node and
    /// never introduces a negative weight.
    fn mutate(&mut self, graph: &mut AdjacencyMatrixGraph<u32>) -> Result<Vec<Mutation>> {
        let steps = 1 + self.rng.next_index(3);
        let mut applied = Vec::with_capacity(steps);

        for _ in 0..steps {
            match self.rng.next_bounded(4) {
                0 if graph.node_count() > 1 => {
                    let index = self.rng.next_index(graph.node_count());
                    let removed = graph.remove_node_at(index)?;
                    applied.push(Mutation::RemoveNode {
                        label: removed.into_label(),
                    });
                }
                1 => {
                    let label = self.fresh_label();
                    graph.add_node(label);
                    let index = graph.index_of(&label)?;
                    let mut edges = 0;
                    for other in 0..graph.node_count() {
                        if self.rng.hit_rate_percent(self.config.edge_percent) {
                            let weight = self.rng.next_weight(self.config.max_weight);
                            edges += usize::from(graph.add_weighted_edge_at(other, index, weight)?);
                        }
                        if self.rng.hit_rate_percent(self.config.edge_percent) {
                            let weight = self.rng.next_weight(self.config.max_weight);
                            edges += usize::from(graph.add_weighted_edge_at(index, other, weight)?);
                        }
                    }
                    applied.push(Mutation::AddNode { label, edges });
                }
                2 => {
                    let from = self.rng.next_index(graph.node_count());
                    let to = self.rng.next_index(graph.node_count());
                    let weight = self.rng.next_weight(self.config.max_weight);
                    if graph.add_weighted_edge_at(from, to, weight)? {
                        applied.push(Mutation::AddEdge {
                            from: *graph.node_at(from)?.label(),
                            to: *graph.node_at(to)?.label(),
                        });
                    }
                }
                _ => {
                    let picked = {
                        let edges = graph.edges();
                        if edges.is_empty() {
                            None
                        } else {
                            let edge = edges[self.rng.next_index(edges.len())];
                            Some((*edge.from().label(), *edge.to().label()))
                        }
                    };
                    if let Some((from, to)) = picked {
                        let weight = self.rng.next_weight(self.config.max_weight);
                        graph.set_edge_weight(&from, &to, Some(weight))?;
                        applied.push(Mutation::Reweight { from, to });
                    }
                }
            }
        }

        Ok(applied)
    }

    const fn fresh_label(&mut self) -> u32 {
        let label = self.next_label;
        self.next_label += 1;
        label
    }
}
