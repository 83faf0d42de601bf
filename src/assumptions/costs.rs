//! Cost structure assumptions
//!
//! Each category has a legacy flat shape and a detailed shape. The shape is
//! picked once when the assumptions are loaded; calculators match on the
//! variant and never probe the raw document again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::sales::non_negative;
use super::schedule::{StepSchedule, YearSchedule};
use crate::error::{ConfigError, ConfigResult};

fn default_founders() -> u32 {
    4
}

fn default_divisor() -> u32 {
    1
}

/// Team-size curve with a single employee salary
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatPersonnel {
    pub team_evolution: StepSchedule,
    /// Founders are counted in the team but draw no salary
    #[serde(default = "default_founders")]
    pub founder_count: u32,
    #[serde(alias = "employee_monthly")]
    pub employee_monthly_salary: f64,
}

/// One role of the detailed roster
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoleConfig {
    #[serde(alias = "salary_brut_annual")]
    pub annual_salary: f64,
    /// Headcount milestones (fractional FTE allowed)
    #[serde(alias = "fte_timeline")]
    pub headcount: StepSchedule,
}

/// Per-role roster with employer social charges
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetailedPersonnel {
    pub roles: BTreeMap<String, RoleConfig>,
    #[serde(alias = "charges_sociales_rate")]
    pub social_charges_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonnelConfig {
    Flat(FlatPersonnel),
    Detailed(DetailedPersonnel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelAssumptions {
    pub mode: PersonnelConfig,
    pub freelance_monthly: f64,
}

impl PersonnelAssumptions {
    fn validate(&self) -> ConfigResult<()> {
        non_negative("personnel.freelance_monthly", self.freelance_monthly)?;
        match &self.mode {
            PersonnelConfig::Flat(flat) => {
                non_negative("personnel.employee_monthly_salary", flat.employee_monthly_salary)
            }
            PersonnelConfig::Detailed(detailed) => {
                non_negative("personnel.social_charges_rate", detailed.social_charges_rate)?;
                for (name, role) in &detailed.roles {
                    non_negative(&format!("personnel.roles.{name}.annual_salary"), role.annual_salary)?;
                }
                Ok(())
            }
        }
    }
}

/// Legacy infrastructure: base + flat per-client rate + fixed tool budget
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatInfrastructure {
    pub base_monthly: f64,
    pub per_client_monthly: f64,
    #[serde(default)]
    pub tools_monthly: BTreeMap<String, f64>,
}

/// Per-client cloud rate applying once the customer count exceeds `above_customers`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingTier {
    pub above_customers: f64,
    pub per_client: f64,
}

/// Internal tool billed per seat, with seats derived from team size
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeatTool {
    pub per_seat: f64,
    /// One seat per `team_divisor` team members
    #[serde(default = "default_divisor")]
    pub team_divisor: u32,
    #[serde(default)]
    pub min_seats: u32,
}

impl SeatTool {
    pub fn seats(&self, team_size: u32) -> u32 {
        (team_size / self.team_divisor.max(1)).max(self.min_seats)
    }
}

/// Detailed infrastructure with volume-tiered cloud pricing and seat-based tools
#[derive(Debug, Clone, PartialEq)]
pub struct TieredInfrastructure {
    pub cloud_base_monthly: f64,
    /// Ascending by threshold
    pub scaling_tiers: Vec<ScalingTier>,
    pub seat_tools: BTreeMap<String, SeatTool>,
    pub flat_tools: BTreeMap<String, f64>,
    pub rd_external_monthly: f64,
}

impl TieredInfrastructure {
    pub fn new(
        cloud_base_monthly: f64,
        mut scaling_tiers: Vec<ScalingTier>,
        seat_tools: BTreeMap<String, SeatTool>,
        flat_tools: BTreeMap<String, f64>,
        rd_external_monthly: f64,
    ) -> ConfigResult<Self> {
        if scaling_tiers.is_empty() {
            return Err(ConfigError::EmptyScalingTiers);
        }
        scaling_tiers.sort_by(|a, b| a.above_customers.total_cmp(&b.above_customers));

        if scaling_tiers.windows(2).any(|w| w[1].per_client > w[0].per_client) {
            log::warn!("infrastructure per-client rate increases with volume");
        }

        Ok(Self {
            cloud_base_monthly,
            scaling_tiers,
            seat_tools,
            flat_tools,
            rd_external_monthly,
        })
    }

    /// Per-client rate for the highest tier whose threshold is exceeded,
    /// or the lowest tier when none is.
    pub fn per_client_rate(&self, customers: f64) -> f64 {
        self.scaling_tiers
            .iter()
            .rev()
            .find(|tier| customers > tier.above_customers)
            .or_else(|| self.scaling_tiers.first())
            .map_or(0.0, |tier| tier.per_client)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InfrastructureConfig {
    Flat(FlatInfrastructure),
    Tiered(TieredInfrastructure),
}

impl InfrastructureConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self {
            InfrastructureConfig::Flat(flat) => {
                non_negative("infrastructure.base_monthly", flat.base_monthly)?;
                non_negative("infrastructure.per_client_monthly", flat.per_client_monthly)
            }
            InfrastructureConfig::Tiered(tiered) => {
                non_negative("infrastructure.cloud.base_monthly", tiered.cloud_base_monthly)?;
                non_negative("infrastructure.rd_external", tiered.rd_external_monthly)?;
                for tier in &tiered.scaling_tiers {
                    non_negative("infrastructure.scaling_tiers.per_client", tier.per_client)?;
                }
                Ok(())
            }
        }
    }
}

/// Legacy marketing: monthly base + content, events billed per quarter
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FlatMarketing {
    pub base_monthly: f64,
    #[serde(default)]
    pub content_monthly: f64,
    #[serde(default)]
    pub events_quarterly: f64,
}

/// Marketing channel billed quarterly unless the document says otherwise
pub const EVENTS_CHANNEL: &str = "events";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Billing {
    #[default]
    Monthly,
    /// Billed on months 3, 6, 9, ... at three times the monthly rate
    Quarterly,
}

impl Billing {
    /// Billing for a channel whose document gives none
    pub fn default_for(channel: &str) -> Self {
        if channel == EVENTS_CHANNEL {
            Billing::Quarterly
        } else {
            Billing::Monthly
        }
    }

    pub fn charge(self, monthly_rate: f64, month: u32) -> f64 {
        match self {
            Billing::Monthly => monthly_rate,
            Billing::Quarterly if month % 3 == 0 => monthly_rate * 3.0,
            Billing::Quarterly => 0.0,
        }
    }
}

/// One marketing channel with a monthly budget per calendar year
#[derive(Debug, Clone, PartialEq)]
pub struct MarketingChannel {
    pub monthly_budgets: YearSchedule,
    /// Monthly budget for years before the first defined one
    pub default_monthly: f64,
    pub billing: Billing,
}

impl MarketingChannel {
    pub fn monthly_rate(&self, year: i32) -> f64 {
        self.monthly_budgets.value_at(year).unwrap_or(self.default_monthly)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarketingConfig {
    Flat(FlatMarketing),
    Channels(BTreeMap<String, MarketingChannel>),
}

impl MarketingConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self {
            MarketingConfig::Flat(flat) => {
                non_negative("marketing.base_monthly", flat.base_monthly)?;
                non_negative("marketing.content_monthly", flat.content_monthly)?;
                non_negative("marketing.events_quarterly", flat.events_quarterly)
            }
            MarketingConfig::Channels(channels) => {
                for (name, channel) in channels {
                    let field = format!("marketing.{name}.default_monthly");
                    non_negative(&field, channel.default_monthly)?;
                    for (year, budget) in channel.monthly_budgets.values() {
                        non_negative(&format!("marketing.{name}.monthly_budgets.y{year}"), budget)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Cash injection at a given month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingEvent {
    pub month: u32,
    pub amount: f64,
    #[serde(default)]
    pub source: Option<String>,
}

/// All cost assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct CostAssumptions {
    pub personnel: PersonnelAssumptions,
    pub infrastructure: InfrastructureConfig,
    pub marketing: MarketingConfig,
    pub admin_monthly: f64,
}

impl CostAssumptions {
    pub(crate) fn validate(&self) -> ConfigResult<()> {
        self.personnel.validate()?;
        self.infrastructure.validate()?;
        self.marketing.validate()?;
        non_negative("admin.monthly", self.admin_monthly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiered() -> TieredInfrastructure {
        TieredInfrastructure::new(
            1_500.0,
            vec![
                ScalingTier { above_customers: 100.0, per_client: 30.0 },
                ScalingTier { above_customers: 0.0, per_client: 50.0 },
                ScalingTier { above_customers: 50.0, per_client: 40.0 },
            ],
            BTreeMap::new(),
            BTreeMap::new(),
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_per_client_rate_steps_down() {
        let infra = tiered();

        assert_eq!(infra.per_client_rate(0.0), 50.0);
        assert_eq!(infra.per_client_rate(10.0), 50.0);
        assert_eq!(infra.per_client_rate(50.0), 50.0);
        assert_eq!(infra.per_client_rate(50.5), 40.0);
        assert_eq!(infra.per_client_rate(100.0), 40.0);
        assert_eq!(infra.per_client_rate(101.0), 30.0);
    }

    #[test]
    fn test_empty_tiers_rejected() {
        let result = TieredInfrastructure::new(0.0, vec![], BTreeMap::new(), BTreeMap::new(), 0.0);
        assert!(matches!(result, Err(ConfigError::EmptyScalingTiers)));
    }

    #[test]
    fn test_seat_tool_minimum() {
        let github = SeatTool { per_seat: 21.0, team_divisor: 2, min_seats: 2 };

        assert_eq!(github.seats(2), 2);
        assert_eq!(github.seats(9), 4);
        assert_eq!(github.seats(12), 6);
    }

    #[test]
    fn test_quarterly_billing() {
        assert_eq!(Billing::Quarterly.charge(1_000.0, 2), 0.0);
        assert_eq!(Billing::Quarterly.charge(1_000.0, 3), 3_000.0);
        assert_eq!(Billing::Quarterly.charge(1_000.0, 12), 3_000.0);
        assert_eq!(Billing::Monthly.charge(1_000.0, 2), 1_000.0);
    }

    #[test]
    fn test_events_channel_defaults_to_quarterly() {
        assert_eq!(Billing::default_for("events"), Billing::Quarterly);
        assert_eq!(Billing::default_for("digital_ads"), Billing::Monthly);
    }

    #[test]
    fn test_negative_marketing_rejected() {
        let flat = MarketingConfig::Flat(FlatMarketing {
            base_monthly: 5_000.0,
            content_monthly: -1.0,
            events_quarterly: 15_000.0,
        });
        assert!(matches!(flat.validate(), Err(ConfigError::RateOutOfRange { .. })));

        let channel = MarketingChannel {
            monthly_budgets: YearSchedule::from_pairs([(2026, 2_000.0), (2027, -500.0)]),
            default_monthly: 1_000.0,
            billing: Billing::Monthly,
        };
        let channels =
            MarketingConfig::Channels(BTreeMap::from([("ads".to_string(), channel.clone())]));
        assert!(channels.validate().is_err());

        let bad_default = MarketingChannel {
            monthly_budgets: YearSchedule::default(),
            default_monthly: f64::INFINITY,
            ..channel
        };
        let channels =
            MarketingConfig::Channels(BTreeMap::from([("ads".to_string(), bad_default)]));
        assert!(channels.validate().is_err());

        let ok = MarketingConfig::Flat(FlatMarketing {
            base_monthly: 5_000.0,
            content_monthly: 2_000.0,
            events_quarterly: 15_000.0,
        });
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_channel_rate_by_year() {
        let channel = MarketingChannel {
            monthly_budgets: YearSchedule::from_pairs([(2026, 2_000.0), (2028, 5_000.0)]),
            default_monthly: 1_500.0,
            billing: Billing::Monthly,
        };

        assert_eq!(channel.monthly_rate(2025), 1_500.0);
        assert_eq!(channel.monthly_rate(2027), 2_000.0);
        assert_eq!(channel.monthly_rate(2029), 5_000.0);
    }
}
