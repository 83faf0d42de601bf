//! Core projection engine for monthly business plan projections

use log::{debug, info};

use super::costs::{admin_cost, infrastructure_cost, marketing_cost, personnel_cost};
use super::records::{CostBreakdown, MonthMetrics, MonthRecord, ProjectionResult, RevenueBreakdown};
use super::revenue::{enterprise_hub_revenue, factory_revenue, hackathon_revenue, services_revenue};
use super::state::SubscriberState;
use crate::assumptions::AssumptionsConfig;
use crate::error::{ConfigError, ConfigResult};

/// Horizon of the detailed plan
pub const DEFAULT_HORIZON_MONTHS: u32 = 50;

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Number of months to project
    pub horizon_months: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: AssumptionsConfig,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine. Validation happens here so that the
    /// monthly loop never fails.
    pub fn new(assumptions: AssumptionsConfig, config: ProjectionConfig) -> ConfigResult<Self> {
        if config.horizon_months == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        assumptions.validate()?;
        Ok(Self { assumptions, config })
    }

    pub fn assumptions(&self) -> &AssumptionsConfig {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection for months `1..=horizon`, in order
    pub fn run(&self) -> ProjectionResult {
        let horizon = self.config.horizon_months;
        info!(
            "Projecting {} months from {}",
            horizon,
            self.assumptions.timeline.label(1)
        );

        let mut result = ProjectionResult::with_capacity(horizon as usize);
        for month in 1..=horizon {
            let record = self.simulate_month(month, result.last());

            if self.assumptions.timeline.is_year_end(month) || month == horizon {
                info!(
                    "Month {} ({}): revenue {:.0}, ARR {:.0}, cash {:.0}, team {:.1}",
                    record.month,
                    record.label,
                    record.revenue.total,
                    record.metrics.arr,
                    record.metrics.cash,
                    record.metrics.team_size
                );
            }
            result.add_record(record);
        }

        if let Some(last) = result.last() {
            info!(
                "Projection complete: final cash {:.0}, final ARR {:.0}",
                last.metrics.cash, last.metrics.arr
            );
        }
        result
    }

    /// Compute one month from the assumptions and the immediately preceding record
    pub fn simulate_month(&self, month: u32, previous: Option<&MonthRecord>) -> MonthRecord {
        let assumptions = &self.assumptions;

        // Revenue
        let hackathon = hackathon_revenue(assumptions, month);
        let factory = factory_revenue(assumptions, month);
        let prior_subscribers = previous
            .map(|record| record.revenue.enterprise_hub.customers)
            .unwrap_or(SubscriberState::ZERO);
        let enterprise_hub = enterprise_hub_revenue(assumptions, month, &prior_subscribers);
        let services = services_revenue(assumptions, month, hackathon.volume, factory.volume);
        let revenue = RevenueBreakdown::new(hackathon, factory, enterprise_hub, services);

        // Costs, driven by this month's customer count and team size
        let personnel = personnel_cost(assumptions, month);
        let infrastructure =
            infrastructure_cost(assumptions, enterprise_hub.total_customers, personnel.team_size);
        let marketing = marketing_cost(assumptions, month);
        let team_size = personnel.team_size;
        let costs = CostBreakdown::new(personnel, infrastructure, marketing, admin_cost(assumptions));

        // Metrics
        let ebitda = revenue.total - costs.total;
        let funding = assumptions.funding_for(month);
        let previous_cash = previous.map(|record| record.metrics.cash).unwrap_or(0.0);
        let metrics = MonthMetrics {
            ebitda,
            burn: (-ebitda).max(0.0),
            mrr: enterprise_hub.mrr,
            arr: enterprise_hub.arr,
            funding,
            cash: previous_cash + ebitda + funding,
            team_size,
        };

        debug!(
            "m{}: revenue {:.2}, costs {:.2}, ebitda {:.2}, arr {:.2}, cash {:.2}",
            month, revenue.total, costs.total, ebitda, metrics.arr, metrics.cash
        );

        MonthRecord {
            month,
            label: assumptions.timeline.label(month),
            year: assumptions.timeline.year_of(month),
            revenue,
            costs,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{
        FlatPersonnel, MonthSchedule, PeriodSchedule, PersonnelConfig, PricePeriod, StepSchedule,
        TierDistribution, YearSchedule,
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn engine(assumptions: AssumptionsConfig, horizon_months: u32) -> ProjectionEngine {
        ProjectionEngine::new(assumptions, ProjectionConfig { horizon_months }).unwrap()
    }

    fn detailed_plan() -> AssumptionsConfig {
        AssumptionsConfig::from_json_str(include_str!("../../data/plan_50m.json")).unwrap()
    }

    #[test]
    fn test_projection_runs() {
        let result = engine(AssumptionsConfig::default_plan(), 14).run();

        assert_eq!(result.len(), 14);
        assert_eq!(result.records[0].label, "2025-11");
        assert_eq!(result.records[13].month, 14);
        assert_eq!(result.records[13].year, 2026);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let err = ProjectionEngine::new(
            AssumptionsConfig::default_plan(),
            ProjectionConfig { horizon_months: 0 },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroHorizon));
    }

    #[test]
    fn test_invalid_assumptions_rejected() {
        let mut assumptions = AssumptionsConfig::default_plan();
        assumptions.sales.hub.churn_monthly = 1.0;

        assert!(ProjectionEngine::new(assumptions, ProjectionConfig::default()).is_err());
    }

    #[test]
    fn test_total_revenue_is_sum_of_products() {
        for result in [
            engine(AssumptionsConfig::default_plan(), 14).run(),
            engine(detailed_plan(), 50).run(),
        ] {
            for record in &result.records {
                let revenue = &record.revenue;
                let expected = revenue.hackathon.revenue
                    + revenue.factory.revenue
                    + revenue.enterprise_hub.mrr
                    + revenue.services.revenue;
                assert_relative_eq!(revenue.total, expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_cash_recurrence() {
        let result = engine(detailed_plan(), 50).run();

        let mut previous_cash = 0.0;
        for record in &result.records {
            let expected =
                previous_cash + record.revenue.total - record.costs.total + record.metrics.funding;
            assert_abs_diff_eq!(record.metrics.cash, expected, epsilon = 1e-6);
            previous_cash = record.metrics.cash;
        }

        assert_eq!(result.at_month(26).map(|r| r.metrics.funding), Some(3_000_000.0));
        assert_eq!(result.at_month(27).map(|r| r.metrics.funding), Some(0.0));
    }

    #[test]
    fn test_burn_and_arr_derivation() {
        let result = engine(detailed_plan(), 50).run();

        for record in &result.records {
            let metrics = &record.metrics;
            assert_eq!(metrics.burn, (-metrics.ebitda).max(0.0));
            assert_eq!(metrics.arr, metrics.mrr * 12.0);
        }
    }

    #[test]
    fn test_subscribers_non_negative() {
        for churn in [0.0, 0.3, 0.99] {
            let mut assumptions = detailed_plan();
            assumptions.sales.hub.churn_monthly = churn;

            for record in &engine(assumptions, 50).run().records {
                let customers = record.revenue.enterprise_hub.customers;
                assert!(customers.starter >= 0.0);
                assert!(customers.business >= 0.0);
                assert!(customers.enterprise >= 0.0);
            }
        }
    }

    #[test]
    fn test_hub_zero_before_launch() {
        let assumptions = detailed_plan();
        let launch = assumptions.sales.hub.launch_month;
        let result = engine(assumptions, 50).run();

        for record in result.records.iter().filter(|r| r.month < launch) {
            let hub = &record.revenue.enterprise_hub;
            assert_eq!(hub.mrr, 0.0);
            assert_eq!(hub.arr, 0.0);
            assert_eq!(hub.customers, SubscriberState::ZERO);
        }
        assert!(result.records[launch as usize - 1].revenue.enterprise_hub.mrr > 0.0);
    }

    #[test]
    fn test_factory_zero_within_delay() {
        let assumptions = detailed_plan();
        let delay = assumptions.sales.factory.delay_months;
        let result = engine(assumptions, 50).run();

        for month in 1..=delay {
            assert_eq!(result.at_month(month).map(|r| r.revenue.factory.revenue), Some(0.0));
        }
    }

    #[test]
    fn test_deterministic() {
        let first = engine(detailed_plan(), 50).run();
        let second = engine(detailed_plan(), 50).run();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hackathon_single_month_ramp() {
        let mut assumptions = AssumptionsConfig::default_plan();
        assumptions.sales.hackathon.volumes = MonthSchedule::from_pairs([(1, 2.0)]);
        assumptions.pricing.hackathon =
            PeriodSchedule::new("hackathon", vec![PricePeriod::new(1, 6, 1_000.0)]).unwrap();

        let result = engine(assumptions, 14).run();

        assert_eq!(result.records[0].revenue.hackathon.revenue, 2_000.0);
        for record in &result.records[1..] {
            assert_eq!(record.revenue.hackathon.revenue, 0.0);
        }
    }

    #[test]
    fn test_factory_conversion_scenario() {
        let mut assumptions = AssumptionsConfig::default_plan();
        assumptions.sales.hackathon.volumes = MonthSchedule::from_pairs([(1, 10.0)]);
        assumptions.sales.factory.conversion_rate = 0.3;
        assumptions.sales.factory.delay_months = 2;

        let result = engine(assumptions, 14).run();
        assert_eq!(result.records[2].revenue.factory.volume, 3.0);
    }

    #[test]
    fn test_hub_launch_scenario() {
        let mut assumptions = AssumptionsConfig::default_plan();
        let hub = &mut assumptions.sales.hub;
        hub.launch_month = 8;
        hub.new_customers = MonthSchedule::from_pairs([(8, 2.0), (9, 0.0)]);
        hub.long_term_new_customers = YearSchedule::default();
        hub.long_term_default = Some(0.0);
        hub.tier_distribution = TierDistribution {
            starter: 1.0,
            business: 0.0,
            enterprise: 0.0,
        };
        hub.churn_monthly = 0.0;
        hub.starter_to_business = None;
        hub.business_to_enterprise = None;

        let result = engine(assumptions, 14).run();

        assert_eq!(result.records[7].revenue.enterprise_hub.customers.starter, 2.0);
        assert_eq!(result.records[8].revenue.enterprise_hub.customers.starter, 2.0);
    }

    #[test]
    fn test_flat_personnel_scenario() {
        let mut assumptions = AssumptionsConfig::default_plan();
        assumptions.costs.personnel.mode = PersonnelConfig::Flat(FlatPersonnel {
            team_evolution: StepSchedule::from_pairs([(1, 5.0)]),
            founder_count: 4,
            employee_monthly_salary: 6_000.0,
        });

        let result = engine(assumptions, 14).run();
        let personnel = &result.records[0].costs.personnel;

        assert_eq!(personnel.total - personnel.freelance, 6_000.0);
        assert_eq!(result.records[0].metrics.team_size, 5.0);
    }

    #[test]
    fn test_long_term_acquisition_beyond_schedule() {
        let result = engine(detailed_plan(), 50).run();

        // Schedule ends at m14; m15 is 2027-01
        assert_eq!(result.at_month(14).map(|r| r.revenue.enterprise_hub.new_customers), Some(6.0));
        assert_eq!(result.at_month(15).map(|r| r.revenue.enterprise_hub.new_customers), Some(8.0));
        assert_eq!(result.at_month(27).map(|r| r.revenue.enterprise_hub.new_customers), Some(10.0));
        assert_eq!(result.at_month(50).map(|r| r.revenue.enterprise_hub.new_customers), Some(12.0));
    }

    #[test]
    fn test_detailed_costs_flow_into_record() {
        let result = engine(detailed_plan(), 50).run();
        let record = result.at_month(11).unwrap();

        // cto 1, developer 5, sales 2, customer_success 0.5
        assert_relative_eq!(record.metrics.team_size, 8.5);
        assert_eq!(record.costs.personnel.roles.len(), 4);
        assert!(record.costs.infrastructure.tools > 0.0);
        assert_eq!(record.costs.admin, 3_000.0);
    }
}
