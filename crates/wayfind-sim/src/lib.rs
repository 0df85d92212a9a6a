#![forbid(unsafe_code)]
//! wayfind-sim library.
//!
//! Seeded random graphs are built, solved, mutated, and solved again; every
//! round is checked by [`oracle::ShortestPathOracle`] against an independent
//! `petgraph` reference.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types. Oracle findings are
//!   data ([`oracle::InvariantViolation`]), not errors.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod campaign;
pub mod oracle;
pub mod rng;
pub mod simulator;

pub use campaign::{CampaignConfig, CampaignReport, SeedFailure, replay_seed, run_campaign};
pub use oracle::{InvariantViolation, OracleResult, ShortestPathOracle};
pub use rng::DeterministicRng;
pub use simulator::{RoundReport, SimulationConfig, SimulationResult, Simulator};
