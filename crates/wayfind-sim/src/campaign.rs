//! Campaign runner for deterministic simulation campaigns.
//!
//! Runs a range of seeds with shared graph parameters, collecting pass/fail
//! results and the first failing seed for replay.

use std::ops::Range;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use wayfind_core::config::WayfindConfig;
use wayfind_core::{ErrorCode, GraphError, QueueError};
use wayfind_paths::PathError;

use crate::oracle::InvariantViolation;
use crate::{SimulationConfig, SimulationResult, Simulator};

/// Campaign-level configuration: which seeds to run and the graph
/// parameters every seed shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Range of seeds to execute, e.g. `0..100`.
    pub seed_range: Range<u64>,
    pub node_count: usize,
    /// Edge probability per ordered node pair (percent, 0–100).
    pub edge_percent: u8,
    pub max_weight: u32,
    pub mutation_rounds: u32,
    pub revalidate_on_run: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self::from_config(&WayfindConfig::default())
    }
}

impl CampaignConfig {
    /// Campaign settings from a loaded `wayfind.toml`.
    #[must_use]
    pub fn from_config(config: &WayfindConfig) -> Self {
        let sim = &config.sim;
        Self {
            seed_range: sim.seed_start..sim.seed_start.saturating_add(sim.seed_count),
            node_count: sim.node_count,
            edge_percent: sim.edge_percent,
            max_weight: sim.max_weight,
            mutation_rounds: sim.mutation_rounds,
            revalidate_on_run: config.shortest_path.revalidate_on_run,
        }
    }

    /// Build a [`SimulationConfig`] for a specific seed.
    #[must_use]
    pub const fn sim_config_for_seed(&self, seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed,
            node_count: self.node_count,
            edge_percent: self.edge_percent,
            max_weight: self.max_weight,
            mutation_rounds: self.mutation_rounds,
            revalidate_on_run: self.revalidate_on_run,
        }
    }

    /// Validate configuration before running.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.seed_range.is_empty() {
            bail!("seed_range must not be empty");
        }
        if self.node_count == 0 {
            bail!("node_count must be > 0");
        }
        if self.edge_percent > 100 {
            bail!("edge_percent must be <= 100");
        }
        Ok(())
    }
}

/// Failure details for a single seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFailure {
    pub seed: u64,
    /// Human-readable violations, prefixed with the round they occurred in.
    pub violations: Vec<String>,
}

/// Aggregate report produced by a campaign run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub seeds_run: usize,
    pub seeds_passed: usize,
    /// First seed that failed (for prioritized replay).
    pub first_failure: Option<u64>,
    pub failures: Vec<SeedFailure>,
    /// Total oracle-checked rounds across all seeds.
    pub rounds_checked: usize,
}

impl CampaignReport {
    /// True if every seed passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run a full campaign across all seeds in the config.
///
/// # Errors
///
/// Returns an error if config validation fails or a simulation encounters
/// an internal error.
#[instrument(skip_all, fields(seeds = ?config.seed_range))]
pub fn run_campaign(config: &CampaignConfig) -> Result<CampaignReport> {
    config.validate()?;

    let mut seeds_run = 0_usize;
    let mut seeds_passed = 0_usize;
    let mut first_failure: Option<u64> = None;
    let mut failures = Vec::new();
    let mut rounds_checked = 0_usize;

    for seed in config.seed_range.clone() {
        seeds_run += 1;

        let result = run_single_seed(seed, config)?;
        rounds_checked += result.rounds.len();

        let violations = round_violations(&result);
        if violations.is_empty() {
            seeds_passed += 1;
        } else {
            warn!(seed, count = violations.len(), "seed failed");
            if first_failure.is_none() {
                first_failure = Some(seed);
            }
            failures.push(SeedFailure { seed, violations });
        }
    }

    info!(seeds_run, seeds_passed, rounds_checked, "campaign complete");
    Ok(CampaignReport {
        seeds_run,
        seeds_passed,
        first_failure,
        failures,
        rounds_checked,
    })
}

/// Run one seed to completion.
///
/// # Errors
///
/// Returns an error if the simulation itself fails (invalid config, a run
/// rejected outright). Oracle findings live in the returned rounds.
pub fn run_single_seed(seed: u64, config: &CampaignConfig) -> Result<SimulationResult> {
    let mut simulator = Simulator::new(config.sim_config_for_seed(seed))?;
    simulator.run()
}

/// Replay a single seed for debugging.
///
/// # Errors
///
/// Returns an error when config validation or simulation fails.
pub fn replay_seed(seed: u64, config: &CampaignConfig) -> Result<SimulationResult> {
    config.validate()?;
    run_single_seed(seed, config)
}

fn round_violations(result: &SimulationResult) -> Vec<String> {
    result
        .rounds
        .iter()
        .flat_map(|round| {
            round
                .oracle
                .violations
                .iter()
                .map(move |v| format!("round {}: {}", round.round, format_violation(v)))
        })
        .collect()
}

/// The [`ErrorCode`] of the first typed wayfind error in `err`'s chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> Option<ErrorCode> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<PathError>()
            .map(PathError::code)
            .or_else(|| cause.downcast_ref::<GraphError>().map(GraphError::code))
            .or_else(|| cause.downcast_ref::<QueueError>().map(QueueError::code))
    })
}

/// Format an invariant violation into a human-readable string.
#[must_use]
pub fn format_violation(v: &InvariantViolation) -> String {
    match v {
        InvariantViolation::IndexContiguity {
            index,
            label,
            mapped_to,
        } => {
            format!("IndexContiguity: index {index} holds {label:?} which maps to {mapped_to:?}")
        }
        InvariantViolation::Distance {
            target,
            reported,
            expected,
        } => match expected {
            Some(expected) => format!("Distance: node {target} reported {reported}, expected {expected}"),
            None => format!("Distance: node {target} reported {reported}, expected unreachable"),
        },
        InvariantViolation::MalformedPath { target, reason } => {
            format!("MalformedPath: path to {target} is broken ({reason})")
        }
        InvariantViolation::PathWeight {
            target,
            path_weight,
            distance,
        } => {
            format!("PathWeight: path to {target} weighs {path_weight} but distance is {distance}")
        }
        InvariantViolation::Reachability {
            target,
            has_path,
            distance,
        } => {
            if *has_path {
                format!("Reachability: node {target} has a path but distance {distance}")
            } else {
                format!("Reachability: node {target} has no path but distance {distance}")
            }
        }
        InvariantViolation::UnstableQuery { target } => {
            format!("UnstableQuery: repeated path query to {target} changed")
        }
        InvariantViolation::QueryFailed { target, error } => {
            format!("QueryFailed: query for {target} failed ({error})")
        }
        InvariantViolation::NotComputed => "NotComputed: no run to check".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seeds: Range<u64>) -> CampaignConfig {
        CampaignConfig {
            seed_range: seeds,
            node_count: 10,
            edge_percent: 25,
            max_weight: 20,
            mutation_rounds: 3,
            revalidate_on_run: true,
        }
    }

    #[test]
    fn campaign_config_default_is_valid() {
        let config = CampaignConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed_range, 0..100);
    }

    #[test]
    fn campaign_config_empty_seed_range_rejected() {
        let config = CampaignConfig {
            seed_range: 5..5,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn campaign_config_zero_nodes_rejected() {
        let config = CampaignConfig {
            node_count: 0,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn campaign_config_percent_over_100_rejected() {
        let config = CampaignConfig {
            edge_percent: 150,
            ..CampaignConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_config_maps_seed_window_and_flag() {
        let mut file = WayfindConfig::default();
        file.sim.seed_start = 40;
        file.sim.seed_count = 5;
        file.shortest_path.revalidate_on_run = false;

        let config = CampaignConfig::from_config(&file);
        assert_eq!(config.seed_range, 40..45);
        assert!(!config.revalidate_on_run);
        assert_eq!(config.node_count, file.sim.node_count);
    }

    #[test]
    fn sim_config_for_seed_uses_correct_seed() {
        let config = CampaignConfig::default();
        let sim = config.sim_config_for_seed(42);
        assert_eq!(sim.seed, 42);
        assert_eq!(sim.node_count, config.node_count);
        assert_eq!(sim.mutation_rounds, config.mutation_rounds);
    }

    #[test]
    fn run_campaign_all_seeds_pass() {
        let report = run_campaign(&small(0..25)).expect("campaign should not error");
        assert_eq!(report.seeds_run, 25);
        assert_eq!(report.seeds_passed, 25);
        assert_eq!(report.rounds_checked, 25 * 4);
        assert!(report.all_passed(), "failures: {:?}", report.failures);
        assert!(report.first_failure.is_none());
    }

    #[test]
    fn weights_only_campaign_passes() {
        let config = CampaignConfig {
            revalidate_on_run: false,
            ..small(100..110)
        };
        let report = run_campaign(&config).expect("campaign should not error");
        assert!(report.all_passed(), "failures: {:?}", report.failures);
    }

    #[test]
    fn replay_is_deterministic() {
        let config = small(0..1);
        let first = replay_seed(7, &config).expect("replay 1");
        let second = replay_seed(7, &config).expect("replay 2");

        assert_eq!(first.rounds.len(), second.rounds.len());
        for (a, b) in first.rounds.iter().zip(&second.rounds) {
            assert_eq!(a.source, b.source);
            assert_eq!(a.mutations, b.mutations);
            assert_eq!(a.edge_count, b.edge_count);
            assert_eq!(a.oracle, b.oracle);
        }
    }

    #[test]
    fn replay_validates_config() {
        let config = CampaignConfig {
            node_count: 0,
            ..small(0..1)
        };
        assert!(replay_seed(0, &config).is_err());
    }

    #[test]
    fn campaign_report_serializes_to_json() {
        let report = CampaignReport {
            seeds_run: 10,
            seeds_passed: 9,
            first_failure: Some(7),
            failures: vec![SeedFailure {
                seed: 7,
                violations: vec!["round 2: UnstableQuery: repeated path query to 3 changed".into()],
            }],
            rounds_checked: 50,
        };
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"seeds_run\":10"));
        assert!(json.contains("\"first_failure\":7"));
        assert!(json.contains("\"rounds_checked\":50"));
    }

    #[test]
    fn error_code_finds_typed_causes() {
        use anyhow::Context;

        let err = anyhow::Error::from(PathError::NotComputed);
        assert_eq!(error_code(&err), Some(ErrorCode::NotComputed));

        let wrapped = Err::<(), _>(GraphError::NodeNotFound("7".into()))
            .context("mutating seed 3")
            .expect_err("always an error");
        assert_eq!(error_code(&wrapped), Some(ErrorCode::NodeNotFound));

        let nested = anyhow::Error::from(PathError::from(QueueError::Empty));
        assert_eq!(error_code(&nested), Some(ErrorCode::QueueEmpty));

        assert_eq!(error_code(&anyhow::anyhow!("node_count must be > 0")), None);
    }

    #[test]
    fn format_violation_produces_readable_strings() {
        let s = format_violation(&InvariantViolation::Distance {
            target: 4,
            reported: 3.0,
            expected: None,
        });
        assert!(s.starts_with("Distance"));
        assert!(s.contains("node 4"));
        assert!(s.contains("unreachable"));

        let s = format_violation(&InvariantViolation::Reachability {
            target: 2,
            has_path: false,
            distance: 5.0,
        });
        assert!(s.contains("no path"));
    }
}
