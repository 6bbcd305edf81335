//! Dice-roll HTTP microservice.
//!
//! Three routes:
//!
//! ```text
//! GET /health   200 {"status":"ok"} | 500 {"status":"not-ready"}
//! GET /dice     200 {"dice": 1..=6}
//! GET /metrics  200 Prometheus text (dice_rolls_total, app_ready)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment and readiness
//! - [`error`]: Unified error types
//! - [`metrics`]: Per-instance Prometheus recorder
//! - [`logging`]: Stdout and file log output
//! - [`api`]: HTTP handlers and router
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod utils;

pub use config::{Config, ReadinessSource};
pub use error::{Result, ServiceError};
