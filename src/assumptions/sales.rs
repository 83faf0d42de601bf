//! Sales ramp assumptions per product line

use serde::{Deserialize, Serialize};

use super::schedule::{MonthSchedule, YearSchedule};
use crate::error::{ConfigError, ConfigResult};

/// New hub customers per month once both the schedule and any long-term
/// assumption are exhausted
pub const FALLBACK_HUB_NEW_CUSTOMERS: f64 = 8.0;

/// Extra factor applied on top of each upgrade rate (monthly trickle)
pub const UPGRADE_DAMPENER: f64 = 0.1;

/// Share of hackathons that generate a services engagement
pub const DEFAULT_HACKATHON_ATTACH_RATE: f64 = 0.5;

/// Share of factory projects that generate a services engagement
pub const DEFAULT_FACTORY_ATTACH_RATE: f64 = 0.2;

/// Hackathon volumes by month
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HackathonSales {
    #[serde(alias = "volumes_monthly")]
    pub volumes: MonthSchedule,
}

/// Hackathon to Factory conversion funnel
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FactorySales {
    pub conversion_rate: f64,
    pub delay_months: u32,
}

impl Default for FactorySales {
    fn default() -> Self {
        Self {
            conversion_rate: 0.30,
            delay_months: 2,
        }
    }
}

/// Split of new subscribers across tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierDistribution {
    #[serde(default)]
    pub starter: f64,
    #[serde(default)]
    pub business: f64,
    #[serde(default)]
    pub enterprise: f64,
}

impl Default for TierDistribution {
    fn default() -> Self {
        Self {
            starter: 0.70,
            business: 0.25,
            enterprise: 0.05,
        }
    }
}

impl TierDistribution {
    fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("tier_distribution.starter", self.starter),
            ("tier_distribution.business", self.business),
            ("tier_distribution.enterprise", self.enterprise),
        ] {
            non_negative(field, value)?;
        }

        let sum = self.starter + self.business + self.enterprise;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::TierDistribution { sum });
        }
        Ok(())
    }
}

/// One-directional migration from a lower tier to the next one
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct UpgradePath {
    /// Months after launch before the migration starts
    pub after_months: u32,
    pub rate: f64,
}

/// EnterpriseHub subscription assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct HubSales {
    pub launch_month: u32,
    pub new_customers: MonthSchedule,
    /// Monthly acquisition per calendar year beyond the schedule horizon
    pub long_term_new_customers: YearSchedule,
    pub long_term_default: Option<f64>,
    pub tier_distribution: TierDistribution,
    pub churn_monthly: f64,
    pub starter_to_business: Option<UpgradePath>,
    pub business_to_enterprise: Option<UpgradePath>,
}

impl HubSales {
    /// New subscribers acquired in `month` (calendar year `year`).
    ///
    /// Scheduled months use the schedule; missing months inside the schedule
    /// horizon acquire nobody; months past the horizon use the long-term
    /// assumptions, then [`FALLBACK_HUB_NEW_CUSTOMERS`].
    pub fn new_customers_for(&self, month: u32, year: i32) -> f64 {
        if let Some(scheduled) = self.new_customers.get(month) {
            return scheduled;
        }

        let beyond_horizon = self.new_customers.last_month().map_or(true, |last| month > last);
        if !beyond_horizon {
            return 0.0;
        }

        self.long_term_new_customers
            .value_at(year)
            .or(self.long_term_default)
            .unwrap_or(FALLBACK_HUB_NEW_CUSTOMERS)
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        if !(0.0..1.0).contains(&self.churn_monthly) {
            return Err(ConfigError::RateOutOfRange {
                field: "enterprise_hub.churn_monthly".to_string(),
                value: self.churn_monthly,
                expected: "0 <= churn < 1",
            });
        }
        self.tier_distribution.validate()?;

        for (month, count) in self.new_customers.values() {
            non_negative(&format!("enterprise_hub.new_customers.m{month}"), count)?;
        }
        for (year, count) in self.long_term_new_customers.values() {
            non_negative(&format!("long_term.hub_new_customers.y{year}"), count)?;
        }
        if let Some(count) = self.long_term_default {
            non_negative("long_term.default_hub_new_customers", count)?;
        }

        for (field, path) in [
            ("upgrades.starter_to_business.rate", self.starter_to_business),
            ("upgrades.business_to_enterprise.rate", self.business_to_enterprise),
        ] {
            if let Some(path) = path {
                unit_interval(field, path.rate)?;
            }
        }
        Ok(())
    }
}

/// Services engagements attached to hackathons and factory projects
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ServicesAttach {
    #[serde(default = "default_hackathon_attach")]
    pub hackathon_attach_rate: f64,
    #[serde(default = "default_factory_attach")]
    pub factory_attach_rate: f64,
}

fn default_hackathon_attach() -> f64 {
    DEFAULT_HACKATHON_ATTACH_RATE
}

fn default_factory_attach() -> f64 {
    DEFAULT_FACTORY_ATTACH_RATE
}

impl Default for ServicesAttach {
    fn default() -> Self {
        Self {
            hackathon_attach_rate: DEFAULT_HACKATHON_ATTACH_RATE,
            factory_attach_rate: DEFAULT_FACTORY_ATTACH_RATE,
        }
    }
}

/// All sales ramp assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct SalesAssumptions {
    pub hackathon: HackathonSales,
    pub factory: FactorySales,
    pub hub: HubSales,
    pub services: ServicesAttach,
}

impl SalesAssumptions {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        unit_interval("factory.conversion_rate", self.factory.conversion_rate)?;
        non_negative("services.hackathon_attach_rate", self.services.hackathon_attach_rate)?;
        non_negative("services.factory_attach_rate", self.services.factory_attach_rate)?;
        for (month, volume) in self.hackathon.volumes.values() {
            non_negative(&format!("hackathon.volumes.m{month}"), volume)?;
        }
        self.hub.validate()
    }
}

pub(crate) fn non_negative(field: &str, value: f64) -> ConfigResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange {
            field: field.to_string(),
            value,
            expected: ">= 0",
        })
    }
}

pub(crate) fn unit_interval(field: &str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange {
            field: field.to_string(),
            value,
            expected: "0 <= rate <= 1",
        })
    }
}
