//! cmdb-graph - Dependency graph and status propagation for CMDB topologies.
//!
//! Given a snapshot of infrastructure items, the groups that contain them and
//! the connections between them, this crate computes which nodes and edges
//! are degraded by an upstream node's status and how severely.
//!
//! The engine ([`graph`], [`status`], [`severity`], [`propagation`]) is
//! synchronous and pure: every call takes a complete snapshot and returns a
//! fresh result. The remaining modules load snapshots and configuration and
//! drive the CLI.
//!
//! # Example
//!
//! ```
//! use cmdb_graph::domain::{Connection, Item, Status};
//! use cmdb_graph::propagation::annotate_edges;
//!
//! let items = vec![
//!     Item::new(1, None, Status::Inactive),
//!     Item::new(2, None, Status::Active),
//!     Item::new(3, None, Status::Active),
//! ];
//! let connections = [Connection::items(1, 2), Connection::items(2, 3)];
//!
//! let annotations = annotate_edges(&items, &connections, &[], &[]);
//! let downstream = annotations.values().find(|r| r.is_propagated).unwrap();
//! assert_eq!(downstream.propagated_status, Some(Status::Inactive));
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod error;
pub mod graph;
pub mod propagation;
pub mod severity;
pub mod source;
pub mod status;

// Public CLI modules (needed by binary)
pub mod app;
pub mod cli;
pub mod config;
pub mod output;
