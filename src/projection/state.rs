//! EnterpriseHub subscriber population carried between months

use serde::{Deserialize, Serialize};

use crate::assumptions::{HubSales, TierPrices, UpgradePath, UPGRADE_DAMPENER};

/// Subscribers per tier. Counts are real-valued (expected customers), never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriberState {
    pub starter: f64,
    pub business: f64,
    pub enterprise: f64,
}

impl SubscriberState {
    /// Population before launch
    pub const ZERO: Self = Self {
        starter: 0.0,
        business: 0.0,
        enterprise: 0.0,
    };

    pub fn total(&self) -> f64 {
        self.starter + self.business + self.enterprise
    }

    /// Monthly recurring revenue at the given tier prices
    pub fn mrr(&self, prices: &TierPrices) -> f64 {
        self.starter * prices.starter
            + self.business * prices.business
            + self.enterprise * prices.enterprise
    }

    /// Population after one active month: churn on the existing base, this
    /// month's acquisitions split by tier, then upward migration.
    pub fn advance(&self, hub: &HubSales, month: u32, new_customers: f64) -> Self {
        let retention = 1.0 - hub.churn_monthly;
        let split = hub.tier_distribution;

        let mut next = Self {
            starter: self.starter * retention + new_customers * split.starter,
            business: self.business * retention + new_customers * split.business,
            enterprise: self.enterprise * retention + new_customers * split.enterprise,
        };

        // Both migrations read the pre-migration population, so a customer
        // moves at most one tier per month
        let to_business = migration(hub.starter_to_business, hub.launch_month, month, next.starter);
        let to_enterprise =
            migration(hub.business_to_enterprise, hub.launch_month, month, next.business);

        next.starter -= to_business;
        next.business += to_business - to_enterprise;
        next.enterprise += to_enterprise;
        next
    }
}

/// Customers moving up from a tier holding `population` this month
fn migration(path: Option<UpgradePath>, launch_month: u32, month: u32, population: f64) -> f64 {
    match path {
        Some(path) if month >= launch_month.saturating_add(path.after_months) => {
            population * path.rate * UPGRADE_DAMPENER
        }
        _ => 0.0,
    }
}
