//! Persistence Layer
//!
//! This module defines the store abstraction the services are written
//! against:
//!
//! - [`SparkStore`] - the trait pinning down every query shape the core needs
//!   (point lookup, per-parent and per-level child listings, paged search,
//!   bulk save/delete)
//! - [`MemorySparkStore`] - the embedded in-memory reference backend
//!
//! The backing engine offers no multi-document transactions; all-or-nothing
//! behavior exists only at single-bulk-call granularity.

mod memory_store;
mod spark_store;

pub use memory_store::MemorySparkStore;
pub use spark_store::SparkStore;
