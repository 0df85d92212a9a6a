#![forbid(unsafe_code)]
//! wayfind-core library.
//!
//! Graph entities, the adjacency-matrix directed graph store, and the
//! handle-indexed binary min-heap that the shortest-path computer in
//! `wayfind-paths` is built on.
//!
//! # Conventions
//!
//! - **Errors**: Each module returns its own `thiserror` enum
//!   ([`graph::GraphError`], [`queue::QueueError`]); all of them map onto the
//!   shared [`error::ErrorKind`] taxonomy and [`error::ErrorCode`] table.
//!   Configuration loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`, `warn!`). No
//!   subscriber is installed by library code.

pub mod config;
pub mod error;
pub mod graph;
pub mod queue;

pub use config::{ShortestPathConfig, SimConfig, WayfindConfig};
pub use error::{ErrorCode, ErrorKind};
pub use graph::{AdjacencyMatrixGraph, Graph, GraphEdge, GraphError, GraphNode};
pub use queue::{BinaryHeapMinPriorityQueue, PriorityQueueElement, QueueEntry, QueueError};
