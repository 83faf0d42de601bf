//! Forecast Engine CLI
//!
//! Runs a projection over the built-in plan or a JSON assumptions file and
//! prints the month records to stdout.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forecast_engine::projection::{ProjectionSummary, DEFAULT_HORIZON_MONTHS};
use forecast_engine::{AssumptionsConfig, ProjectionConfig, ProjectionEngine, ProjectionResult, ScenarioRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "forecast", about = "Monthly business plan projection")]
struct Cli {
    /// JSON assumptions document. Defaults to the built-in 14-month plan.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of months to project.
    #[arg(long)]
    months: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also run the scenarios declared in the assumptions.
    #[arg(long, default_value_t = false)]
    scenarios: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (assumptions, default_months) = match &cli.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open assumptions: {}", path.display()))?;
            let assumptions = AssumptionsConfig::from_reader(BufReader::new(file))
                .with_context(|| format!("invalid assumptions: {}", path.display()))?;
            (assumptions, DEFAULT_HORIZON_MONTHS)
        }
        None => (AssumptionsConfig::default_plan(), 14),
    };

    let config = ProjectionConfig {
        horizon_months: cli.months.unwrap_or(default_months),
    };
    let engine = ProjectionEngine::new(assumptions.clone(), config)?;
    let result = engine.run();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Table => write_table(&mut out, &result)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&mut out, &result)?,
    }

    if cli.scenarios {
        let runner = ScenarioRunner::new(assumptions);
        let outcomes = runner.run_declared(config)?;

        writeln!(out)?;
        writeln!(
            out,
            "{:<12} {:>6} {:>14} {:>14} {:>14}",
            "Scenario", "Prob", "Revenue", "Final ARR", "Final Cash"
        )?;
        writeln!(out, "{}", "-".repeat(64))?;
        for outcome in &outcomes {
            writeln!(
                out,
                "{:<12} {:>6.2} {:>14.0} {:>14.0} {:>14.0}",
                outcome.scenario.name,
                outcome.scenario.probability,
                outcome.summary.total_revenue,
                outcome.summary.final_arr,
                outcome.summary.final_cash
            )?;
        }
        writeln!(
            out,
            "Expected final ARR: {:.0}",
            ScenarioRunner::expected_final_arr(&outcomes)
        )?;
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, result: &ProjectionResult) -> Result<()> {
    writeln!(
        out,
        "{:>5} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>6}",
        "Month", "Label", "Revenue", "Costs", "EBITDA", "ARR", "Cash", "Team"
    )?;
    writeln!(out, "{}", "-".repeat(86))?;

    for record in &result.records {
        writeln!(
            out,
            "{:>5} {:>8} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>6.1}",
            record.month,
            record.label,
            record.revenue.total,
            record.costs.total,
            record.metrics.ebitda,
            record.metrics.arr,
            record.metrics.cash,
            record.metrics.team_size,
        )?;
    }

    write_summary(out, &result.summary())
}

fn write_summary<W: Write>(out: &mut W, summary: &ProjectionSummary) -> Result<()> {
    let month_or_never =
        |month: Option<u32>| month.map_or_else(|| "never".to_string(), |m| format!("M{m}"));

    writeln!(out, "\nSummary:")?;
    writeln!(out, "  Total Months: {}", summary.total_months)?;
    writeln!(out, "  Total Revenue: {:.0}", summary.total_revenue)?;
    writeln!(out, "    Hackathon: {:.0}", summary.total_hackathon)?;
    writeln!(out, "    Factory: {:.0}", summary.total_factory)?;
    writeln!(out, "    EnterpriseHub: {:.0}", summary.total_enterprise_hub)?;
    writeln!(out, "    Services: {:.0}", summary.total_services)?;
    writeln!(out, "  Total Costs: {:.0}", summary.total_costs)?;
    writeln!(out, "  Total Funding: {:.0}", summary.total_funding)?;
    writeln!(out, "  Final Cash: {:.0}", summary.final_cash)?;
    writeln!(
        out,
        "  Min Cash: {:.0} ({})",
        summary.min_cash,
        month_or_never(summary.min_cash_month)
    )?;
    writeln!(out, "  Max Burn: {:.0}", summary.max_burn)?;
    writeln!(out, "  Final MRR / ARR: {:.0} / {:.0}", summary.final_mrr, summary.final_arr)?;
    writeln!(out, "  Final Team Size: {:.1}", summary.final_team_size)?;
    writeln!(
        out,
        "  First Positive EBITDA: {}",
        month_or_never(summary.first_positive_ebitda_month)
    )?;
    writeln!(out, "  Cash Never Negative: {}", summary.cash_never_negative)?;
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, result: &ProjectionResult) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "month",
        "label",
        "year",
        "hackathon_volume",
        "hackathon_revenue",
        "factory_volume",
        "factory_revenue",
        "hub_starter",
        "hub_business",
        "hub_enterprise",
        "hub_mrr",
        "services_volume",
        "services_revenue",
        "total_revenue",
        "personnel",
        "infrastructure",
        "marketing",
        "admin",
        "total_costs",
        "ebitda",
        "burn",
        "arr",
        "funding",
        "cash",
        "team_size",
    ])?;

    for record in &result.records {
        let revenue = &record.revenue;
        let costs = &record.costs;
        let metrics = &record.metrics;
        let customers = revenue.enterprise_hub.customers;

        let mut row = vec![record.month.to_string(), record.label.clone(), record.year.to_string()];
        row.extend(
            [
                revenue.hackathon.volume,
                revenue.hackathon.revenue,
                revenue.factory.volume,
                revenue.factory.revenue,
                customers.starter,
                customers.business,
                customers.enterprise,
                revenue.enterprise_hub.mrr,
                revenue.services.volume,
                revenue.services.revenue,
                revenue.total,
                costs.personnel.total,
                costs.infrastructure.total,
                costs.marketing.total,
                costs.admin,
                costs.total,
                metrics.ebitda,
                metrics.burn,
                metrics.arr,
                metrics.funding,
                metrics.cash,
                metrics.team_size,
            ]
            .iter()
            .map(|value| format!("{:.4}", value)),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
