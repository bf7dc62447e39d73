//! Ignitr Core Business Logic Layer
//!
//! This crate manages a forest of hierarchically-linked sparks with embedded
//! good/bad reasons: subtree materialization from a flat store, cascade and
//! promote delete strategies, score enrichment through an external service
//! with graceful degradation, and depth/children-bounded tree views.
//!
//! # Architecture
//!
//! - **Flat store, transient trees**: sparks persist as flat documents keyed
//!   by id with a `parent_id` back reference; trees are assembled per read
//!   request and never stored
//! - **Level-batched assembly**: one store query per tree level, so latency
//!   scales with depth, not node count
//! - **Best-effort scoring**: the external scorer annotates trees when it is
//!   reachable; outages degrade reads to unscored views instead of failing
//!
//! # Modules
//!
//! - [`models`] - data structures (Spark, Reason, tree views, pagination)
//! - [`db`] - store abstraction and the in-memory reference backend
//! - [`services`] - business services (SparkService, ReasonService)
//! - [`scoring`] - scoring service client and response mapping

pub mod db;
pub mod models;
pub mod scoring;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use services::*;
