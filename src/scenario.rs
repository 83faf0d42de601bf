//! Scenario runner for batch projections
//!
//! Holds the base assumptions once, then runs any number of adjusted plans.
//! Each scenario is its own sequential month chain, so scenarios can run in
//! parallel.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionsConfig;
use crate::error::ConfigResult;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary};

fn default_multiplier() -> f64 {
    1.0
}

/// Adjustments applied on top of the base assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Weight used for expected values across a scenario set
    pub probability: f64,
    #[serde(default = "default_multiplier")]
    pub hackathon_volume_multiplier: f64,
    /// Overrides the factory conversion rate when set
    #[serde(default)]
    pub factory_conversion_rate: Option<f64>,
    #[serde(default)]
    pub hub_launch_delay_months: u32,
}

impl Scenario {
    /// Scenario that leaves the base plan untouched
    pub fn base(probability: f64) -> Self {
        Self {
            name: "base".to_string(),
            probability,
            hackathon_volume_multiplier: 1.0,
            factory_conversion_rate: None,
            hub_launch_delay_months: 0,
        }
    }

    /// Base / upside / downside
    pub fn standard_set() -> Vec<Self> {
        vec![
            Self::base(0.6),
            Self {
                name: "upside".to_string(),
                probability: 0.2,
                hackathon_volume_multiplier: 1.2,
                factory_conversion_rate: Some(0.35),
                hub_launch_delay_months: 0,
            },
            Self {
                name: "downside".to_string(),
                probability: 0.2,
                hackathon_volume_multiplier: 0.8,
                factory_conversion_rate: Some(0.25),
                hub_launch_delay_months: 2,
            },
        ]
    }

    /// Adjusted copy of `base`. A launch delay moves the whole acquisition
    /// schedule along with the launch month.
    pub fn apply(&self, base: &AssumptionsConfig) -> AssumptionsConfig {
        let mut adjusted = base.clone();
        let sales = &mut adjusted.sales;

        if self.hackathon_volume_multiplier != 1.0 {
            sales.hackathon.volumes = sales.hackathon.volumes.scaled(self.hackathon_volume_multiplier);
        }
        if let Some(rate) = self.factory_conversion_rate {
            sales.factory.conversion_rate = rate;
        }
        if self.hub_launch_delay_months > 0 {
            let delay = self.hub_launch_delay_months;
            sales.hub.launch_month = sales.hub.launch_month.saturating_add(delay);
            sales.hub.new_customers = sales.hub.new_customers.shifted(delay);
        }
        adjusted
    }
}

/// Result of one scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub result: ProjectionResult,
    pub summary: ProjectionSummary,
}

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::default_plan();
/// let outcomes = runner.run_scenarios(&Scenario::standard_set(), ProjectionConfig::default())?;
/// let expected = ScenarioRunner::expected_final_arr(&outcomes);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Pre-loaded base assumptions
    base_assumptions: AssumptionsConfig,
}

impl ScenarioRunner {
    /// Create runner with pre-built assumptions
    pub fn new(assumptions: AssumptionsConfig) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Create runner with the built-in plan
    pub fn default_plan() -> Self {
        Self::new(AssumptionsConfig::default_plan())
    }

    /// Create runner from a JSON assumptions document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(Self::new(AssumptionsConfig::from_json_str(json)?))
    }

    /// Run the base assumptions unchanged
    pub fn run_base(&self, config: ProjectionConfig) -> ConfigResult<ProjectionResult> {
        Ok(ProjectionEngine::new(self.base_assumptions.clone(), config)?.run())
    }

    /// Run a single scenario
    pub fn run(&self, scenario: &Scenario, config: ProjectionConfig) -> ConfigResult<ScenarioOutcome> {
        let engine = ProjectionEngine::new(scenario.apply(&self.base_assumptions), config)?;
        let result = engine.run();
        let summary = result.summary();

        info!(
            "Scenario {}: final ARR {:.0}, final cash {:.0}",
            scenario.name, summary.final_arr, summary.final_cash
        );
        Ok(ScenarioOutcome {
            scenario: scenario.clone(),
            result,
            summary,
        })
    }

    /// Run several scenarios in parallel. Outcomes keep the input order.
    pub fn run_scenarios(
        &self,
        scenarios: &[Scenario],
        config: ProjectionConfig,
    ) -> ConfigResult<Vec<ScenarioOutcome>> {
        scenarios
            .par_iter()
            .map(|scenario| self.run(scenario, config))
            .collect()
    }

    /// Run the scenarios declared in the assumptions
    pub fn run_declared(&self, config: ProjectionConfig) -> ConfigResult<Vec<ScenarioOutcome>> {
        self.run_scenarios(&self.base_assumptions.scenarios, config)
    }

    /// Probability-weighted final ARR
    pub fn expected_final_arr(outcomes: &[ScenarioOutcome]) -> f64 {
        outcomes
            .iter()
            .map(|outcome| outcome.scenario.probability * outcome.summary.final_arr)
            .sum()
    }

    /// Get reference to base assumptions for inspection
    pub fn assumptions(&self) -> &AssumptionsConfig {
        &self.base_assumptions
    }

    /// Get mutable reference to base assumptions for customization
    pub fn assumptions_mut(&mut self) -> &mut AssumptionsConfig {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::default_plan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> ProjectionConfig {
        ProjectionConfig { horizon_months: 24 }
    }

    #[test]
    fn test_standard_set_probabilities() {
        let total: f64 = Scenario::standard_set().iter().map(|s| s.probability).sum();
        assert_relative_eq!(total, 1.0);
    }

    #[test]
    fn test_base_scenario_matches_plain_run() {
        let runner = ScenarioRunner::default_plan();

        let plain = runner.run_base(config()).unwrap();
        let base = runner.run(&Scenario::base(1.0), config()).unwrap();
        assert_eq!(plain, base.result);
    }

    #[test]
    fn test_apply_adjustments() {
        let base = AssumptionsConfig::default_plan();
        let downside = &Scenario::standard_set()[2];

        let adjusted = downside.apply(&base);
        assert_eq!(adjusted.sales.hub.launch_month, 10);
        assert_eq!(adjusted.sales.hub.new_customers.get(10), Some(2.0));
        assert_eq!(adjusted.sales.factory.conversion_rate, 0.25);
        assert_relative_eq!(adjusted.sales.hackathon.volumes.get_or_zero(1), 1.5 * 0.8);
    }

    #[test]
    fn test_scenarios_run_in_order() {
        let runner = ScenarioRunner::default_plan();
        let scenarios = Scenario::standard_set();

        let outcomes = runner.run_scenarios(&scenarios, config()).unwrap();
        assert_eq!(outcomes.len(), 3);
        for (outcome, scenario) in outcomes.iter().zip(&scenarios) {
            assert_eq!(outcome.scenario.name, scenario.name);
            assert_eq!(outcome.result.len(), 24);
        }

        // Upside sells more hackathons than downside
        let upside = &outcomes[1].summary;
        let downside = &outcomes[2].summary;
        assert!(upside.total_hackathon > downside.total_hackathon);
        assert!(upside.total_factory > downside.total_factory);
    }

    #[test]
    fn test_expected_final_arr() {
        let runner = ScenarioRunner::default_plan();
        let outcomes = runner.run_declared(config()).unwrap();

        let expected: f64 = outcomes
            .iter()
            .map(|o| o.scenario.probability * o.summary.final_arr)
            .sum();
        assert_relative_eq!(ScenarioRunner::expected_final_arr(&outcomes), expected);
        assert!(expected > 0.0);
    }

    #[test]
    fn test_invalid_horizon_propagates() {
        let runner = ScenarioRunner::default_plan();
        let result = runner.run_scenarios(
            &Scenario::standard_set(),
            ProjectionConfig { horizon_months: 0 },
        );
        assert!(result.is_err());
    }
}
