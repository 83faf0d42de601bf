//! Monthly projection engine: subscriber state, revenue and cost calculators,
//! month records and the sequential runner

mod costs;
mod engine;
mod records;
mod revenue;
mod state;

pub use costs::{
    admin_cost, infrastructure_cost, marketing_cost, personnel_cost, InfrastructureCost,
    MarketingCost, PersonnelCost, RoleCost,
};
pub use engine::{ProjectionConfig, ProjectionEngine, DEFAULT_HORIZON_MONTHS};
pub use records::{
    CostBreakdown, MonthMetrics, MonthRecord, ProjectionResult, ProjectionSummary,
    RevenueBreakdown,
};
pub use revenue::{
    enterprise_hub_revenue, factory_revenue, hackathon_revenue, services_revenue, FactoryLine,
    HubRevenue, ProductLine,
};
pub use state::SubscriberState;
