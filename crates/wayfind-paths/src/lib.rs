#![forbid(unsafe_code)]
//! wayfind-paths library.
//!
//! Single-source shortest paths with Dijkstra's algorithm over any
//! [`wayfind_core::Graph`], driven by the handle-indexed binary min-heap from
//! `wayfind-core`.
//!
//! # Conventions
//!
//! - **Errors**: [`PathError`] wraps graph and queue errors and maps onto the
//!   shared [`wayfind_core::ErrorKind`] taxonomy.
//! - **Logging**: `tracing` spans on construction and on every run.

pub mod dijkstra;

pub use dijkstra::{DijkstraShortestPathComputer, PathError};
