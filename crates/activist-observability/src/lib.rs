//! Activist Observability
//!
//! This crate provides observability features:
//! - Structured logging setup
//! - Metrics collection (Prometheus)
//! - Health endpoints

pub mod health;
pub mod logging;
pub mod metrics;

pub use health::{HealthState, ReadinessChecker, health_router};
pub use logging::{LoggingError, init_logging};
pub use metrics::Metrics;
