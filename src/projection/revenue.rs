//! Revenue calculators, one per product line
//!
//! Each calculator is a pure function of the month, the assumptions and (for
//! EnterpriseHub only) the previous month's subscriber population.

use serde::{Deserialize, Serialize};

use super::state::SubscriberState;
use crate::assumptions::AssumptionsConfig;

/// Units sold, unit price and revenue for a product line
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub volume: f64,
    pub unit_price: f64,
    pub revenue: f64,
}

impl ProductLine {
    fn priced(volume: f64, unit_price: f64) -> Self {
        Self {
            volume,
            unit_price,
            revenue: volume * unit_price,
        }
    }
}

/// Factory projects converted from earlier hackathons
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactoryLine {
    pub volume: f64,
    pub unit_price: f64,
    pub revenue: f64,
    /// Hackathon month feeding this month's conversions
    pub source_month: Option<u32>,
    pub source_volume: f64,
}

/// EnterpriseHub subscriptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HubRevenue {
    pub customers: SubscriberState,
    pub total_customers: f64,
    pub new_customers: f64,
    pub mrr: f64,
    pub arr: f64,
}

/// `volume = ramp(month)`, priced at the active hackathon period
pub fn hackathon_revenue(assumptions: &AssumptionsConfig, month: u32) -> ProductLine {
    let volume = assumptions.sales.hackathon.volumes.get_or_zero(month);
    ProductLine::priced(volume, assumptions.pricing.hackathon.resolve(month))
}

/// Conversions of the hackathons run exactly `delay_months` earlier.
/// Zero until the funnel has a source month.
pub fn factory_revenue(assumptions: &AssumptionsConfig, month: u32) -> FactoryLine {
    let funnel = &assumptions.sales.factory;
    let source_month = i64::from(month) - i64::from(funnel.delay_months);
    if source_month < 1 {
        return FactoryLine::default();
    }
    let source_month = source_month as u32;

    let source_volume = assumptions.sales.hackathon.volumes.get_or_zero(source_month);
    let volume = source_volume * funnel.conversion_rate;
    let unit_price = assumptions.pricing.factory.resolve(month);

    FactoryLine {
        volume,
        unit_price,
        revenue: volume * unit_price,
        source_month: Some(source_month),
        source_volume,
    }
}

/// Subscription revenue from the population after this month's transition.
///
/// `prior` is the previous month's population. It is ignored at the launch
/// month, which always starts from zero.
pub fn enterprise_hub_revenue(
    assumptions: &AssumptionsConfig,
    month: u32,
    prior: &SubscriberState,
) -> HubRevenue {
    let hub = &assumptions.sales.hub;
    if month < hub.launch_month {
        return HubRevenue::default();
    }

    let prior = if month == hub.launch_month {
        SubscriberState::ZERO
    } else {
        *prior
    };

    let new_customers = hub.new_customers_for(month, assumptions.timeline.year_of(month));
    let customers = prior.advance(hub, month, new_customers);
    let mrr = customers.mrr(&assumptions.pricing.hub_tiers);

    HubRevenue {
        customers,
        total_customers: customers.total(),
        new_customers,
        mrr,
        arr: mrr * 12.0,
    }
}

/// Services engagements attached to this month's hackathons and factory projects
pub fn services_revenue(
    assumptions: &AssumptionsConfig,
    month: u32,
    hackathon_units: f64,
    factory_units: f64,
) -> ProductLine {
    let attach = &assumptions.sales.services;
    let volume =
        hackathon_units * attach.hackathon_attach_rate + factory_units * attach.factory_attach_rate;
    ProductLine::priced(volume, assumptions.pricing.services.resolve(month))
}
