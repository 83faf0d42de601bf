//! Month records and projection output structures

use serde::{Deserialize, Serialize};

use super::costs::{InfrastructureCost, MarketingCost, PersonnelCost};
use super::revenue::{FactoryLine, HubRevenue, ProductLine};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub hackathon: ProductLine,
    pub factory: FactoryLine,
    pub enterprise_hub: HubRevenue,
    pub services: ProductLine,
    pub total: f64,
}

impl RevenueBreakdown {
    pub fn new(
        hackathon: ProductLine,
        factory: FactoryLine,
        enterprise_hub: HubRevenue,
        services: ProductLine,
    ) -> Self {
        let total = hackathon.revenue + factory.revenue + enterprise_hub.mrr + services.revenue;
        Self {
            hackathon,
            factory,
            enterprise_hub,
            services,
            total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub personnel: PersonnelCost,
    pub infrastructure: InfrastructureCost,
    pub marketing: MarketingCost,
    pub admin: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn new(
        personnel: PersonnelCost,
        infrastructure: InfrastructureCost,
        marketing: MarketingCost,
        admin: f64,
    ) -> Self {
        let total = personnel.total + infrastructure.total + marketing.total + admin;
        Self {
            personnel,
            infrastructure,
            marketing,
            admin,
            total,
        }
    }
}

/// Derived per-month figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthMetrics {
    pub ebitda: f64,
    /// Shortfall when costs exceed revenue, zero otherwise
    pub burn: f64,
    pub mrr: f64,
    pub arr: f64,
    pub funding: f64,
    /// Cumulative cash at end of month
    pub cash: f64,
    pub team_size: f64,
}

/// One simulated month. Never modified once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: u32,
    /// Calendar label, `YYYY-MM`
    pub label: String,
    pub year: i32,
    pub revenue: RevenueBreakdown,
    pub costs: CostBreakdown,
    pub metrics: MonthMetrics,
}

/// Ordered month records for a single run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub records: Vec<MonthRecord>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(months: usize) -> Self {
        Self {
            records: Vec::with_capacity(months),
        }
    }

    /// Append the next month's record
    pub fn add_record(&mut self, record: MonthRecord) {
        self.records.push(record);
    }

    pub fn last(&self) -> Option<&MonthRecord> {
        self.records.last()
    }

    /// Record for a 1-based month index
    pub fn at_month(&self, month: u32) -> Option<&MonthRecord> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.records.get(index).filter(|record| record.month == month)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let sum = |f: fn(&MonthRecord) -> f64| -> f64 { self.records.iter().map(f).sum() };

        let total_hackathon = sum(|r| r.revenue.hackathon.revenue);
        let total_factory = sum(|r| r.revenue.factory.revenue);
        let total_enterprise_hub = sum(|r| r.revenue.enterprise_hub.mrr);
        let total_services = sum(|r| r.revenue.services.revenue);
        let total_revenue = sum(|r| r.revenue.total);
        let total_costs = sum(|r| r.costs.total);
        let total_funding = sum(|r| r.metrics.funding);

        let last = self.records.last();
        let final_cash = last.map(|r| r.metrics.cash).unwrap_or(0.0);
        let final_mrr = last.map(|r| r.metrics.mrr).unwrap_or(0.0);
        let final_arr = last.map(|r| r.metrics.arr).unwrap_or(0.0);
        let final_team_size = last.map(|r| r.metrics.team_size).unwrap_or(0.0);

        let (min_cash, min_cash_month) = self
            .records
            .iter()
            .map(|r| (r.metrics.cash, r.month))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or((0.0, None), |(cash, month)| (cash, Some(month)));

        let max_burn = self
            .records
            .iter()
            .map(|r| r.metrics.burn)
            .fold(0.0, f64::max);

        let first_positive_ebitda_month = self
            .records
            .iter()
            .find(|r| r.metrics.ebitda > 0.0)
            .map(|r| r.month);

        ProjectionSummary {
            total_months: self.records.len() as u32,
            total_revenue,
            total_hackathon,
            total_factory,
            total_enterprise_hub,
            total_services,
            total_costs,
            total_ebitda: total_revenue - total_costs,
            total_funding,
            final_cash,
            min_cash,
            min_cash_month,
            max_burn,
            final_mrr,
            final_arr,
            final_team_size,
            first_positive_ebitda_month,
            cash_never_negative: self.records.iter().all(|r| r.metrics.cash >= 0.0),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub total_revenue: f64,
    pub total_hackathon: f64,
    pub total_factory: f64,
    pub total_enterprise_hub: f64,
    pub total_services: f64,
    pub total_costs: f64,
    pub total_ebitda: f64,
    pub total_funding: f64,
    pub final_cash: f64,
    pub min_cash: f64,
    pub min_cash_month: Option<u32>,
    pub max_burn: f64,
    pub final_mrr: f64,
    pub final_arr: f64,
    pub final_team_size: f64,
    pub first_positive_ebitda_month: Option<u32>,
    pub cash_never_negative: bool,
}
