//! Cost calculators, one per category

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assumptions::{
    AssumptionsConfig, InfrastructureConfig, MarketingConfig, PersonnelConfig, EVENTS_CHANNEL,
};

/// Cost of one role in the detailed roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleCost {
    pub headcount: f64,
    pub monthly_salary: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonnelCost {
    /// Whole people in flat mode, fractional FTE in detailed mode
    pub team_size: f64,
    /// Salaried team members
    pub employees: f64,
    pub gross_salaries: f64,
    pub social_charges: f64,
    pub freelance: f64,
    pub total: f64,
    /// Per-role breakdown (detailed mode only; roles with no headcount are omitted)
    pub roles: BTreeMap<String, RoleCost>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureCost {
    pub cloud: f64,
    pub per_client_rate: f64,
    pub tools: f64,
    pub rd_external: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketingCost {
    pub channels: BTreeMap<String, f64>,
    pub total: f64,
}

pub fn personnel_cost(assumptions: &AssumptionsConfig, month: u32) -> PersonnelCost {
    let personnel = &assumptions.costs.personnel;
    let freelance = personnel.freelance_monthly;

    match &personnel.mode {
        PersonnelConfig::Flat(flat) => {
            let founders = f64::from(flat.founder_count);
            // Before the first milestone only the founders are on board
            let team_size = flat.team_evolution.value_at(month).unwrap_or(founders).round();
            let employees = (team_size - founders).max(0.0);
            let gross_salaries = employees * flat.employee_monthly_salary;

            PersonnelCost {
                team_size,
                employees,
                gross_salaries,
                social_charges: 0.0,
                freelance,
                total: gross_salaries + freelance,
                roles: BTreeMap::new(),
            }
        }
        PersonnelConfig::Detailed(detailed) => {
            let mut roles = BTreeMap::new();
            let mut team_size = 0.0;
            let mut gross_salaries = 0.0;

            for (name, role) in &detailed.roles {
                let headcount = role.headcount.value_at(month).unwrap_or(0.0);
                if headcount <= 0.0 {
                    continue;
                }
                let monthly_salary = role.annual_salary / 12.0;
                let cost = monthly_salary * headcount;

                team_size += headcount;
                gross_salaries += cost;
                roles.insert(
                    name.clone(),
                    RoleCost {
                        headcount,
                        monthly_salary,
                        cost,
                    },
                );
            }

            let social_charges = gross_salaries * detailed.social_charges_rate;

            PersonnelCost {
                team_size,
                employees: team_size,
                gross_salaries,
                social_charges,
                freelance,
                total: gross_salaries + social_charges + freelance,
                roles,
            }
        }
    }
}

/// Hosting scaled by subscriber count plus internal tools scaled by team size
pub fn infrastructure_cost(
    assumptions: &AssumptionsConfig,
    customers: f64,
    team_size: f64,
) -> InfrastructureCost {
    match &assumptions.costs.infrastructure {
        InfrastructureConfig::Flat(flat) => {
            let cloud = flat.base_monthly + customers * flat.per_client_monthly;
            let tools: f64 = flat.tools_monthly.values().sum();

            InfrastructureCost {
                cloud,
                per_client_rate: flat.per_client_monthly,
                tools,
                rd_external: 0.0,
                total: cloud + tools,
            }
        }
        InfrastructureConfig::Tiered(tiered) => {
            let per_client_rate = tiered.per_client_rate(customers);
            let cloud = tiered.cloud_base_monthly + customers * per_client_rate;

            let seats_for = team_size.max(0.0).round() as u32;
            let seat_tools: f64 = tiered
                .seat_tools
                .values()
                .map(|tool| f64::from(tool.seats(seats_for)) * tool.per_seat)
                .sum();
            let flat_tools: f64 = tiered.flat_tools.values().sum();
            let tools = seat_tools + flat_tools;

            InfrastructureCost {
                cloud,
                per_client_rate,
                tools,
                rd_external: tiered.rd_external_monthly,
                total: cloud + tools + tiered.rd_external_monthly,
            }
        }
    }
}

pub fn marketing_cost(assumptions: &AssumptionsConfig, month: u32) -> MarketingCost {
    let channels: BTreeMap<String, f64> = match &assumptions.costs.marketing {
        MarketingConfig::Flat(flat) => {
            let events = if month % 3 == 0 { flat.events_quarterly } else { 0.0 };
            BTreeMap::from([
                ("base".to_string(), flat.base_monthly),
                ("content".to_string(), flat.content_monthly),
                (EVENTS_CHANNEL.to_string(), events),
            ])
        }
        MarketingConfig::Channels(channels) => {
            let year = assumptions.timeline.year_of(month);
            channels
                .iter()
                .map(|(name, channel)| {
                    (name.clone(), channel.billing.charge(channel.monthly_rate(year), month))
                })
                .collect()
        }
    };

    let total = channels.values().sum();
    MarketingCost { channels, total }
}

pub fn admin_cost(assumptions: &AssumptionsConfig) -> f64 {
    assumptions.costs.admin_monthly
}
