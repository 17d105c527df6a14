//! Storage layer for Larder
//!
//! This crate implements the in-memory graph backend:
//! - ShardedStore: DashMap-backed node and edge maps
//! - Secondary indices (label index, adjacency index)
//! - Version management with AtomicU64
//!
//! The store holds committed state only. Transactions, read-set tracking and
//! visibility filtering live in `larder-concurrency`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sharded;

pub use sharded::ShardedStore;
