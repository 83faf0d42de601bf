//! Forecast Engine - monthly business plan projections
//!
//! This library provides:
//! - Assumption loading and validation (pricing periods, sales ramp, costs, funding)
//! - Revenue by product line, including the stateful EnterpriseHub subscriber model
//! - Personnel, infrastructure, marketing and admin costs
//! - Month-by-month EBITDA, burn, ARR and cash
//! - Multi-scenario runs

pub mod assumptions;
pub mod error;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::AssumptionsConfig;
pub use error::{ConfigError, ConfigResult};
pub use projection::{MonthRecord, ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use scenario::{Scenario, ScenarioRunner};
