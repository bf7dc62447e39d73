//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `SparkService` - spark CRUD, subtree assembly, delete strategies, and
//!   scored tree reads with fallback
//! - `ReasonService` - embedded reason operations over the owning spark
//!
//! Services coordinate between the store layer and the scoring gateway,
//! implementing business rules and orchestrating multi-query operations.

pub mod error;
pub mod reason_service;
pub mod spark_service;

pub use error::SparkServiceError;
pub use reason_service::{ReasonService, ReasonUpdate};
pub use spark_service::{ParentScope, SparkService};
