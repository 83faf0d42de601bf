//! Configuration errors surfaced before a projection run starts

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Pricing for '{product}' has no periods")]
    EmptyPeriods { product: String },

    #[error("Period {start}..={end} for '{product}' ends before it starts")]
    InvertedPeriod { product: String, start: u32, end: u32 },

    #[error("Periods for '{product}' overlap at month {month}")]
    OverlappingPeriods { product: String, month: u32 },

    #[error("Invalid schedule key '{key}' (expected forms like \"m7\" or \"y2027\")")]
    InvalidScheduleKey { key: String },

    #[error("Rate '{field}' = {value} is out of range ({expected})")]
    RateOutOfRange {
        field: String,
        value: f64,
        expected: &'static str,
    },

    #[error("Tier distribution sums to {sum}, expected 1.0")]
    TierDistribution { sum: f64 },

    #[error("Infrastructure scaling tiers are empty")]
    EmptyScalingTiers,

    #[error("Missing configuration section: {0}")]
    MissingSection(&'static str),

    #[error("Invalid timeline start '{0}' (expected YYYY-MM)")]
    InvalidTimelineStart(String),

    #[error("Projection horizon must be at least one month")]
    ZeroHorizon,

    #[error("Malformed assumptions document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
