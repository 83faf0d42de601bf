//! Price periods and subscription tier pricing

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// A price (or budget) that is constant over an inclusive month range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePeriod {
    pub start_month: u32,
    pub end_month: u32,
    #[serde(alias = "price_eur")]
    pub price: f64,
}

impl PricePeriod {
    pub fn new(start_month: u32, end_month: u32, price: f64) -> Self {
        Self {
            start_month,
            end_month,
            price,
        }
    }

    pub fn contains(&self, month: u32) -> bool {
        self.start_month <= month && month <= self.end_month
    }
}

/// Validated list of price periods for one product.
///
/// Never empty, no inverted ranges, no overlaps. Lookups for a month outside
/// every period fall back to the first declared period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSchedule {
    periods: Vec<PricePeriod>,
}

impl PeriodSchedule {
    pub fn new(product: &str, periods: Vec<PricePeriod>) -> ConfigResult<Self> {
        if periods.is_empty() {
            return Err(ConfigError::EmptyPeriods {
                product: product.to_string(),
            });
        }

        for period in &periods {
            if period.start_month > period.end_month {
                return Err(ConfigError::InvertedPeriod {
                    product: product.to_string(),
                    start: period.start_month,
                    end: period.end_month,
                });
            }
        }

        let mut ordered = periods.clone();
        ordered.sort_by_key(|p| p.start_month);
        for pair in ordered.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if next.start_month <= current.end_month {
                return Err(ConfigError::OverlappingPeriods {
                    product: product.to_string(),
                    month: next.start_month,
                });
            }
            if next.start_month > current.end_month + 1 {
                log::warn!(
                    "pricing for '{}' has a gap between M{} and M{}; first period price applies there",
                    product,
                    current.end_month,
                    next.start_month
                );
            }
        }

        Ok(Self { periods })
    }

    /// Two contiguous periods: `first` for months `1..switch_month`, `second`
    /// from `switch_month` through `end_month`
    pub fn two_phase(switch_month: u32, end_month: u32, first: f64, second: f64) -> Self {
        let switch_month = switch_month.max(2);
        let end_month = end_month.max(switch_month);
        Self {
            periods: vec![
                PricePeriod::new(1, switch_month - 1, first),
                PricePeriod::new(switch_month, end_month, second),
            ],
        }
    }

    /// Active price for `month`: the first period containing it, otherwise
    /// the first declared period.
    pub fn resolve(&self, month: u32) -> f64 {
        self.periods
            .iter()
            .find(|p| p.contains(month))
            .or_else(|| self.periods.first())
            .map_or(0.0, |p| p.price)
    }

    pub fn periods(&self) -> &[PricePeriod] {
        &self.periods
    }
}

/// Monthly subscription price per EnterpriseHub tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPrices {
    #[serde(alias = "starter_monthly")]
    pub starter: f64,
    #[serde(alias = "business_monthly")]
    pub business: f64,
    #[serde(alias = "enterprise_monthly")]
    pub enterprise: f64,
}

impl Default for TierPrices {
    fn default() -> Self {
        Self {
            starter: 500.0,
            business: 2_000.0,
            enterprise: 10_000.0,
        }
    }
}

/// Per-product pricing
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub hackathon: PeriodSchedule,
    pub factory: PeriodSchedule,
    pub services: PeriodSchedule,
    pub hub_tiers: TierPrices,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_periods() -> PeriodSchedule {
        PeriodSchedule::new(
            "hackathon",
            vec![PricePeriod::new(1, 6, 18_000.0), PricePeriod::new(7, 14, 19_800.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_active_period() {
        let schedule = two_periods();

        assert_eq!(schedule.resolve(1), 18_000.0);
        assert_eq!(schedule.resolve(6), 18_000.0);
        assert_eq!(schedule.resolve(7), 19_800.0);
        assert_eq!(schedule.resolve(14), 19_800.0);
    }

    #[test]
    fn test_resolve_falls_back_to_first_period() {
        let schedule = two_periods();

        // Beyond the covered horizon, the first declared period applies
        assert_eq!(schedule.resolve(15), 18_000.0);
        assert_eq!(schedule.resolve(0), 18_000.0);
    }

    #[test]
    fn test_fallback_uses_declared_order() {
        let schedule = PeriodSchedule::new(
            "factory",
            vec![PricePeriod::new(7, 14, 82_500.0), PricePeriod::new(1, 6, 75_000.0)],
        )
        .unwrap();

        assert_eq!(schedule.resolve(3), 75_000.0);
        assert_eq!(schedule.resolve(20), 82_500.0);
    }

    #[test]
    fn test_two_phase_is_contiguous() {
        let schedule = PeriodSchedule::two_phase(7, 14, 10_000.0, 17_500.0);

        assert_eq!(schedule.periods(), two_periods_with(10_000.0, 17_500.0).periods());
        assert_eq!(schedule.resolve(6), 10_000.0);
        assert_eq!(schedule.resolve(7), 17_500.0);
    }

    fn two_periods_with(first: f64, second: f64) -> PeriodSchedule {
        PeriodSchedule::new(
            "services",
            vec![PricePeriod::new(1, 6, first), PricePeriod::new(7, 14, second)],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_periods_rejected() {
        let err = PeriodSchedule::new("services", vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPeriods { .. }));
    }

    #[test]
    fn test_inverted_and_overlapping_rejected() {
        let inverted = PeriodSchedule::new("hackathon", vec![PricePeriod::new(6, 1, 1.0)]);
        assert!(matches!(inverted, Err(ConfigError::InvertedPeriod { .. })));

        let overlapping = PeriodSchedule::new(
            "hackathon",
            vec![PricePeriod::new(1, 6, 1.0), PricePeriod::new(6, 12, 2.0)],
        );
        assert!(matches!(
            overlapping,
            Err(ConfigError::OverlappingPeriods { month: 6, .. })
        ));
    }

    #[test]
    fn test_gap_is_accepted() {
        let schedule = PeriodSchedule::new(
            "hackathon",
            vec![PricePeriod::new(1, 3, 100.0), PricePeriod::new(6, 9, 200.0)],
        )
        .unwrap();

        assert_eq!(schedule.resolve(4), 100.0);
        assert_eq!(schedule.resolve(8), 200.0);
    }
}
