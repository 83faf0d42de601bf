//! JSON assumptions document loader
//!
//! The document keeps the section layout of the planning workbook: legacy
//! cost sections under `costs`, and optional detailed sections at the top
//! level (`personnel_details`, `infrastructure_costs`, `marketing_budgets`).
//! [`RawAssumptions::resolve`] picks one shape per cost category.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Deserialize;

use super::costs::{
    Billing, CostAssumptions, DetailedPersonnel, FlatInfrastructure, FlatMarketing, FlatPersonnel,
    FundingEvent, InfrastructureConfig, MarketingChannel, MarketingConfig, PersonnelAssumptions,
    PersonnelConfig, ScalingTier, SeatTool, TieredInfrastructure,
};
use super::pricing::{PeriodSchedule, PricePeriod, Pricing, TierPrices};
use super::sales::{
    FactorySales, HackathonSales, HubSales, SalesAssumptions, ServicesAttach, TierDistribution,
    UpgradePath,
};
use super::schedule::{MonthSchedule, StepSchedule, YearSchedule};
use super::timeline::Timeline;
use super::AssumptionsConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::scenario::Scenario;

#[derive(Debug, Deserialize)]
struct RawPeriods {
    periods: Vec<PricePeriod>,
}

#[derive(Debug, Deserialize)]
struct RawHubPricing {
    launch_month: u32,
    #[serde(default)]
    tiers: TierPrices,
}

#[derive(Debug, Deserialize)]
struct RawPricing {
    hackathon: RawPeriods,
    factory: RawPeriods,
    services: RawPeriods,
    enterprise_hub: RawHubPricing,
}

#[derive(Debug, Default, Deserialize)]
struct RawUpgradePatterns {
    starter_to_business_after_months: Option<u32>,
    starter_to_business_rate: Option<f64>,
    business_to_enterprise_after_months: Option<u32>,
    business_to_enterprise_rate: Option<f64>,
}

impl RawUpgradePatterns {
    fn path(after_months: Option<u32>, rate: Option<f64>) -> Option<UpgradePath> {
        match (after_months, rate) {
            (Some(after_months), Some(rate)) => Some(UpgradePath { after_months, rate }),
            (None, Some(rate)) => Some(UpgradePath { after_months: 3, rate }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHubSales {
    #[serde(default, alias = "new_customers_monthly")]
    new_customers: MonthSchedule,
    #[serde(default, alias = "tier_distribution_at_launch")]
    tier_distribution: TierDistribution,
    churn_monthly: f64,
    #[serde(default)]
    upgrade_patterns: RawUpgradePatterns,
}

#[derive(Debug, Deserialize)]
struct RawSales {
    hackathon: HackathonSales,
    #[serde(default)]
    factory: FactorySales,
    enterprise_hub: RawHubSales,
    #[serde(default)]
    services: ServicesAttach,
}

#[derive(Debug, Deserialize)]
struct RawFlatPersonnel {
    team_evolution: Option<StepSchedule>,
    #[serde(default)]
    founder_count: Option<u32>,
    #[serde(alias = "employee_monthly")]
    employee_monthly_salary: Option<f64>,
    #[serde(default)]
    salaries: Option<RawSalaries>,
    #[serde(default, alias = "freelance_monthly_budget")]
    freelance_monthly: f64,
}

#[derive(Debug, Deserialize)]
struct RawSalaries {
    employee_monthly: f64,
}

#[derive(Debug, Deserialize)]
struct RawAdmin {
    monthly: f64,
}

#[derive(Debug, Deserialize)]
struct RawCosts {
    personnel: Option<RawFlatPersonnel>,
    infrastructure: Option<FlatInfrastructure>,
    marketing: Option<FlatMarketing>,
    #[serde(alias = "office_admin")]
    admin: RawAdmin,
}

#[derive(Debug, Deserialize)]
struct RawCloud {
    base_monthly: f64,
    scaling_tiers: Vec<ScalingTier>,
}

#[derive(Debug, Deserialize)]
struct RawInfrastructureCosts {
    cloud: RawCloud,
    #[serde(default)]
    saas_tools: BTreeMap<String, SeatTool>,
    #[serde(default)]
    flat_tools: BTreeMap<String, f64>,
    #[serde(default)]
    rd_external_monthly: f64,
}

#[derive(Debug, Deserialize)]
struct RawMarketingChannel {
    #[serde(default)]
    monthly_budgets: YearSchedule,
    #[serde(default)]
    default_monthly: f64,
    billing: Option<Billing>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLongTerm {
    #[serde(default)]
    hub_new_customers: YearSchedule,
    default_hub_new_customers: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTimeline {
    start: Option<String>,
}

/// The assumptions document as written, before shape resolution
#[derive(Debug, Deserialize)]
pub struct RawAssumptions {
    #[serde(default)]
    timeline: RawTimeline,
    pricing: RawPricing,
    #[serde(alias = "sales_assumptions")]
    sales: RawSales,
    costs: RawCosts,
    personnel_details: Option<DetailedPersonnel>,
    infrastructure_costs: Option<RawInfrastructureCosts>,
    marketing_budgets: Option<BTreeMap<String, RawMarketingChannel>>,
    #[serde(default)]
    long_term: RawLongTerm,
    #[serde(default)]
    fundings: Vec<FundingEvent>,
    #[serde(default)]
    scenarios: Vec<Scenario>,
}

impl RawAssumptions {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> ConfigResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Resolve optional sections into typed variants and build the config.
    /// Does not run cross-field validation; see [`AssumptionsConfig::validate`].
    pub fn resolve(self) -> ConfigResult<AssumptionsConfig> {
        let timeline = match &self.timeline.start {
            Some(start) => Timeline::parse(start)?,
            None => Timeline::default(),
        };

        let pricing = Pricing {
            hackathon: PeriodSchedule::new("hackathon", self.pricing.hackathon.periods)?,
            factory: PeriodSchedule::new("factory", self.pricing.factory.periods)?,
            services: PeriodSchedule::new("services", self.pricing.services.periods)?,
            hub_tiers: self.pricing.enterprise_hub.tiers,
        };

        let hub_raw = self.sales.enterprise_hub;
        let upgrades = hub_raw.upgrade_patterns;
        let hub = HubSales {
            launch_month: self.pricing.enterprise_hub.launch_month,
            new_customers: hub_raw.new_customers,
            long_term_new_customers: self.long_term.hub_new_customers,
            long_term_default: self.long_term.default_hub_new_customers,
            tier_distribution: hub_raw.tier_distribution,
            churn_monthly: hub_raw.churn_monthly,
            starter_to_business: RawUpgradePatterns::path(
                upgrades.starter_to_business_after_months,
                upgrades.starter_to_business_rate,
            ),
            business_to_enterprise: RawUpgradePatterns::path(
                upgrades.business_to_enterprise_after_months,
                upgrades.business_to_enterprise_rate,
            ),
        };

        let sales = SalesAssumptions {
            hackathon: self.sales.hackathon,
            factory: self.sales.factory,
            hub,
            services: self.sales.services,
        };

        let costs = CostAssumptions {
            personnel: resolve_personnel(self.costs.personnel, self.personnel_details)?,
            infrastructure: resolve_infrastructure(
                self.costs.infrastructure,
                self.infrastructure_costs,
            )?,
            marketing: resolve_marketing(self.costs.marketing, self.marketing_budgets)?,
            admin_monthly: self.costs.admin.monthly,
        };

        Ok(AssumptionsConfig {
            timeline,
            pricing,
            sales,
            costs,
            fundings: self.fundings,
            scenarios: self.scenarios,
        })
    }
}

fn resolve_personnel(
    flat: Option<RawFlatPersonnel>,
    detailed: Option<DetailedPersonnel>,
) -> ConfigResult<PersonnelAssumptions> {
    let freelance_monthly = flat.as_ref().map_or(0.0, |f| f.freelance_monthly);

    if let Some(detailed) = detailed {
        if flat.as_ref().is_some_and(|f| f.team_evolution.is_some()) {
            log::warn!("both team_evolution and personnel_details present; using personnel_details");
        }
        return Ok(PersonnelAssumptions {
            mode: PersonnelConfig::Detailed(detailed),
            freelance_monthly,
        });
    }

    let flat = flat.ok_or(ConfigError::MissingSection("costs.personnel"))?;
    let team_evolution = flat
        .team_evolution
        .ok_or(ConfigError::MissingSection("costs.personnel.team_evolution"))?;
    let employee_monthly_salary = flat
        .employee_monthly_salary
        .or(flat.salaries.map(|s| s.employee_monthly))
        .ok_or(ConfigError::MissingSection("costs.personnel.employee_monthly"))?;

    Ok(PersonnelAssumptions {
        mode: PersonnelConfig::Flat(FlatPersonnel {
            team_evolution,
            founder_count: flat.founder_count.unwrap_or(4),
            employee_monthly_salary,
        }),
        freelance_monthly,
    })
}

fn resolve_infrastructure(
    flat: Option<FlatInfrastructure>,
    detailed: Option<RawInfrastructureCosts>,
) -> ConfigResult<InfrastructureConfig> {
    match (flat, detailed) {
        (flat, Some(raw)) => {
            if flat.is_some() {
                log::warn!("both costs.infrastructure and infrastructure_costs present; using infrastructure_costs");
            }
            Ok(InfrastructureConfig::Tiered(TieredInfrastructure::new(
                raw.cloud.base_monthly,
                raw.cloud.scaling_tiers,
                raw.saas_tools,
                raw.flat_tools,
                raw.rd_external_monthly,
            )?))
        }
        (Some(flat), None) => Ok(InfrastructureConfig::Flat(flat)),
        (None, None) => Err(ConfigError::MissingSection("costs.infrastructure")),
    }
}

fn resolve_marketing(
    flat: Option<FlatMarketing>,
    channels: Option<BTreeMap<String, RawMarketingChannel>>,
) -> ConfigResult<MarketingConfig> {
    match (flat, channels) {
        (flat, Some(channels)) => {
            if flat.is_some() {
                log::warn!("both costs.marketing and marketing_budgets present; using marketing_budgets");
            }
            let channels = channels
                .into_iter()
                .map(|(name, raw)| {
                    let billing = raw.billing.unwrap_or_else(|| Billing::default_for(&name));
                    let channel = MarketingChannel {
                        monthly_budgets: raw.monthly_budgets,
                        default_monthly: raw.default_monthly,
                        billing,
                    };
                    (name, channel)
                })
                .collect();
            Ok(MarketingConfig::Channels(channels))
        }
        (Some(flat), None) => Ok(MarketingConfig::Flat(flat)),
        (None, None) => Err(ConfigError::MissingSection("costs.marketing")),
    }
}
