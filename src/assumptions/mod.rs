//! Business plan assumptions: pricing, sales ramp, cost structure and funding

mod costs;
mod pricing;
mod sales;
mod schedule;
mod timeline;
pub mod loader;

pub use costs::{
    Billing, CostAssumptions, DetailedPersonnel, FlatInfrastructure, FlatMarketing, FlatPersonnel,
    FundingEvent, InfrastructureConfig, MarketingChannel, MarketingConfig, PersonnelAssumptions,
    PersonnelConfig, RoleConfig, ScalingTier, SeatTool, TieredInfrastructure, EVENTS_CHANNEL,
};
pub use loader::RawAssumptions;
pub use pricing::{PeriodSchedule, PricePeriod, Pricing, TierPrices};
pub use sales::{
    FactorySales, HackathonSales, HubSales, SalesAssumptions, ServicesAttach, TierDistribution,
    UpgradePath, FALLBACK_HUB_NEW_CUSTOMERS, UPGRADE_DAMPENER,
};
pub use schedule::{last_defined_at_or_before, MonthSchedule, StepSchedule, YearSchedule};
pub use timeline::Timeline;

use std::collections::BTreeMap;
use std::io::Read;

use crate::error::{ConfigError, ConfigResult};
use crate::scenario::Scenario;

/// Container for all projection assumptions. Read-only during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssumptionsConfig {
    pub timeline: Timeline,
    pub pricing: Pricing,
    pub sales: SalesAssumptions,
    pub costs: CostAssumptions,
    pub fundings: Vec<FundingEvent>,
    pub scenarios: Vec<Scenario>,
}

impl AssumptionsConfig {
    /// Built-in 14-month plan using the legacy flat cost shapes
    pub fn default_plan() -> Self {
        Self {
            timeline: Timeline::default(),
            pricing: Pricing {
                // +10% list price from month 7
                hackathon: PeriodSchedule::two_phase(7, 14, 18_000.0, 19_800.0),
                factory: PeriodSchedule::two_phase(7, 14, 75_000.0, 82_500.0),
                services: PeriodSchedule::two_phase(7, 14, 10_000.0, 17_500.0),
                hub_tiers: TierPrices::default(),
            },
            sales: SalesAssumptions {
                hackathon: HackathonSales {
                    volumes: MonthSchedule::from_pairs([
                        (1, 1.5), (2, 2.0), (3, 2.0), (4, 2.5), (5, 2.5), (6, 3.0), (7, 3.0),
                        (8, 3.0), (9, 3.0), (10, 3.0), (11, 4.0), (12, 4.0), (13, 4.0), (14, 4.0),
                    ]),
                },
                factory: FactorySales::default(),
                hub: HubSales {
                    launch_month: 8,
                    new_customers: MonthSchedule::from_pairs([
                        (1, 0.0), (2, 0.0), (3, 0.0), (4, 0.0), (5, 0.0), (6, 0.0), (7, 0.0),
                        (8, 2.0), (9, 2.0), (10, 3.0), (11, 4.0), (12, 4.0), (13, 5.0), (14, 6.0),
                    ]),
                    long_term_new_customers: YearSchedule::default(),
                    long_term_default: None,
                    tier_distribution: TierDistribution::default(),
                    churn_monthly: 0.008,
                    starter_to_business: Some(UpgradePath { after_months: 3, rate: 0.20 }),
                    business_to_enterprise: Some(UpgradePath { after_months: 6, rate: 0.10 }),
                },
                services: ServicesAttach::default(),
            },
            costs: CostAssumptions {
                personnel: PersonnelAssumptions {
                    mode: PersonnelConfig::Flat(FlatPersonnel {
                        team_evolution: StepSchedule::from_pairs([
                            (1, 5.0), (3, 7.0), (7, 9.0), (11, 11.0), (13, 12.0),
                        ]),
                        founder_count: 4,
                        employee_monthly_salary: 6_000.0,
                    }),
                    freelance_monthly: 5_000.0,
                },
                infrastructure: InfrastructureConfig::Flat(FlatInfrastructure {
                    base_monthly: 2_000.0,
                    per_client_monthly: 200.0,
                    tools_monthly: BTreeMap::from([
                        ("development".to_string(), 500.0),
                        ("ops".to_string(), 300.0),
                        ("sales_marketing".to_string(), 800.0),
                        ("security".to_string(), 400.0),
                    ]),
                }),
                marketing: MarketingConfig::Flat(FlatMarketing {
                    base_monthly: 5_000.0,
                    content_monthly: 2_000.0,
                    events_quarterly: 15_000.0,
                }),
                admin_monthly: 3_000.0,
            },
            fundings: vec![
                FundingEvent {
                    month: 1,
                    amount: 150_000.0,
                    source: Some("Pre-seed".to_string()),
                },
                FundingEvent {
                    month: 11,
                    amount: 500_000.0,
                    source: Some("Seed round".to_string()),
                },
            ],
            scenarios: Scenario::standard_set(),
        }
    }

    /// Load and validate a JSON assumptions document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config = RawAssumptions::from_json_str(json)?.resolve()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON assumptions document from a reader
    pub fn from_reader<R: Read>(reader: R) -> ConfigResult<Self> {
        let config = RawAssumptions::from_reader(reader)?.resolve()?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks run once before any month is simulated
    pub fn validate(&self) -> ConfigResult<()> {
        self.sales.validate()?;
        self.costs.validate()?;

        for event in &self.fundings {
            if !event.amount.is_finite() {
                return Err(ConfigError::RateOutOfRange {
                    field: format!("fundings.m{}.amount", event.month),
                    value: event.amount,
                    expected: "finite amount",
                });
            }
        }
        Ok(())
    }

    /// Funding received in exactly this month (events in the same month add up)
    pub fn funding_for(&self, month: u32) -> f64 {
        self.fundings
            .iter()
            .filter(|event| event.month == month)
            .map(|event| event.amount)
            .sum()
    }
}

impl Default for AssumptionsConfig {
    fn default() -> Self {
        Self::default_plan()
    }
}
