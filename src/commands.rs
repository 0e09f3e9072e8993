// src/commands.rs

use clap::{Parser, Subcommand};
use thiserror::Error;

use stock_queue_sim::io::reporting::{self, ReportError};
use stock_queue_sim::io::scenario::{load_scenario, ConfigError, Scenario};
use stock_queue_sim::{
    InventoryResult, InventorySimulator, Policy, QueueSimulator, ShortageAccounting, SimError,
    StrategyComparator,
};

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate one (s, S) policy over the demand series
    Inventory {
        /// Reorder point s
        #[arg(short = 's', long, default_value_t = 10, allow_negative_numbers = true)]
        reorder_point: i64,
        /// Order-up-to level S
        #[arg(short = 'S', long, default_value_t = 40, allow_negative_numbers = true)]
        order_up_to: i64,
        /// Optional scenario YAML file
        #[arg(short, long)]
        config: Option<String>,
        /// Optional CSV file for the period trace
        #[arg(short, long)]
        output: Option<String>,
        /// Only charge shortage still left after the replenishment decision
        #[arg(long)]
        reference_accounting: bool,
    },
    /// Rank candidate (s, S) strategies by total cost
    Compare {
        /// Extra strategy as "s,S"; may be repeated
        #[arg(long = "strategy", value_parser = parse_policy)]
        strategies: Vec<Policy>,
        /// Optional scenario YAML file
        #[arg(short, long)]
        config: Option<String>,
        /// Optional CSV file for the comparison table
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Simulate the single-server queue and compare with M/M/1 formulas
    Queue {
        /// Optional scenario YAML file
        #[arg(short, long)]
        config: Option<String>,
        /// Number of customers to simulate
        #[arg(short = 'n', long)]
        customers: Option<usize>,
        /// Simulated time horizon
        #[arg(long)]
        horizon: Option<f64>,
        /// Timeline sampling step
        #[arg(long)]
        step: Option<f64>,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Optional CSV file for the occupancy timeline
        #[arg(long)]
        timeline_output: Option<String>,
        /// Optional CSV file for the per-customer timings
        #[arg(long)]
        customers_output: Option<String>,
    },
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Simulation(#[from] SimError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn parse_policy(value: &str) -> Result<Policy, String> {
    let (s, big_s) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"s,S\", got \"{value}\""))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid level \"{part}\": {e}"))
    };
    Policy::new(parse(s)?, parse(big_s)?).map_err(|e| e.to_string())
}

fn scenario_from(config: Option<&str>) -> Result<Scenario, CommandError> {
    match config {
        Some(path) => Ok(load_scenario(path)?),
        None => Ok(Scenario::default()),
    }
}

pub fn run(command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Inventory {
            reorder_point,
            order_up_to,
            config,
            output,
            reference_accounting,
        } => inventory_command(
            reorder_point,
            order_up_to,
            config.as_deref(),
            output.as_deref(),
            reference_accounting,
        ),
        Commands::Compare {
            strategies,
            config,
            output,
        } => compare_command(strategies, config.as_deref(), output.as_deref()),
        Commands::Queue {
            config,
            customers,
            horizon,
            step,
            seed,
            timeline_output,
            customers_output,
        } => {
            let mut scenario = scenario_from(config.as_deref())?;
            let queue = &mut scenario.queue;
            queue.num_customers = customers.unwrap_or(queue.num_customers);
            queue.horizon = horizon.unwrap_or(queue.horizon);
            queue.sample_step = step.unwrap_or(queue.sample_step);
            queue.seed = seed.unwrap_or(queue.seed);
            queue_command(
                &scenario,
                timeline_output.as_deref(),
                customers_output.as_deref(),
            )
        }
    }
}

fn inventory_command(
    reorder_point: i64,
    order_up_to: i64,
    config: Option<&str>,
    output: Option<&str>,
    reference_accounting: bool,
) -> Result<(), CommandError> {
    let mut scenario = scenario_from(config)?;
    if reference_accounting {
        scenario.inventory.shortage_accounting = ShortageAccounting::Reference;
    }
    let policy = Policy::new(reorder_point, order_up_to)?;
    let demand = scenario.demand()?;

    println!("=== (s, S) Inventory Simulation ===");
    println!("Policy {policy} over {} periods", demand.len());

    let result = InventorySimulator::new(scenario.inventory).run(&policy, &demand)?;
    print_trace(&result);

    if let Some(path) = output {
        reporting::write_csv(path, &result.records)?;
        println!("Period trace written to {path}");
    }
    Ok(())
}

fn print_trace(result: &InventoryResult) {
    println!(
        "{:>6} {:>7} {:>6} {:>6} {:>11}",
        "Period", "Demand", "Stock", "Order", "Total cost"
    );
    for record in &result.records {
        println!(
            "{:>6} {:>7} {:>6} {:>6} {:>11.2}",
            record.period + 1,
            record.demand,
            record.stock_after_demand,
            record.order_quantity,
            record.running_total_cost
        );
    }

    println!("\n=== Cost Analysis ===");
    println!("Holding cost: {:.2}", result.holding_cost);
    println!("Shortage cost: {:.2}", result.shortage_cost);
    println!("Ordering cost: {:.2}", result.ordering_cost);
    println!("Final cost: {:.2}", result.final_cost());
    println!("Cumulative total cost: {:.2}", result.total_cost());
}

fn compare_command(
    extra: Vec<Policy>,
    config: Option<&str>,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let scenario = scenario_from(config)?;
    let mut policies = scenario.strategies();
    for policy in extra {
        if !policies.contains(&policy) {
            policies.push(policy);
        }
    }

    let comparator = StrategyComparator::new(InventorySimulator::new(scenario.inventory.clone()));
    let rows = comparator.compare(&policies, &scenario.demand()?)?;

    println!("=== Strategy Comparison ===");
    println!(
        "{:<18} {:>12} {:>10} {:>10} {:>13}",
        "Strategy", "Total cost", "Avg cost", "Shortages", "Service level"
    );
    for row in &rows {
        println!(
            "{:<18} {:>12.2} {:>10.2} {:>10} {:>12.1}%",
            row.policy.to_string(),
            row.total_cost,
            row.average_cost_per_period,
            row.shortage_period_count,
            row.service_level * 100.0
        );
    }
    if let Some(best) = rows.first() {
        println!("\nBest strategy (by total cost): {}", best.policy);
    }

    if let Some(path) = output {
        let file = std::fs::File::create(path).map_err(ReportError::from)?;
        reporting::write_comparison(file, &rows)?;
        println!("Comparison written to {path}");
    }
    Ok(())
}

fn queue_command(
    scenario: &Scenario,
    timeline_output: Option<&str>,
    customers_output: Option<&str>,
) -> Result<(), CommandError> {
    let arrivals = scenario.arrivals()?;
    let service = scenario.service()?;
    let result = QueueSimulator::new(scenario.queue.clone()).run(&arrivals, &service)?;
    let metrics = &result.metrics;

    println!("=== Single-Server Queue Simulation ===");
    println!(
        "{} customers, horizon {}, step {}, seed {}",
        result.customers.len(),
        scenario.queue.horizon,
        scenario.queue.sample_step,
        scenario.queue.seed
    );
    println!(
        "lambda = {:.4}, mu = {:.4}, rho = {:.4}",
        metrics.lambda, metrics.mu, metrics.rho
    );

    println!("\n=== Analytic (M/M/1) ===");
    println!("Server idle probability P0: {:.2}", metrics.analytic.p0);
    println!("Mean customers in system L: {:.2}", metrics.analytic.l);
    println!("Mean customers in queue Lq: {:.2}", metrics.analytic.lq);
    println!("Mean time in system W: {:.2}", metrics.analytic.w);
    println!("Mean time in queue Wq: {:.2}", metrics.analytic.wq);

    println!("\n=== Simulated ===");
    println!("Server idle fraction P0: {:.2}", metrics.simulated.p0);
    println!("Mean customers in system L: {:.2}", metrics.simulated.l);
    println!("Mean customers in queue Lq: {:.2}", metrics.simulated.lq);
    println!("Mean time in system W: {:.2}", metrics.simulated.w);
    println!("Mean time in queue Wq: {:.2}", metrics.simulated.wq);

    if let Some(path) = timeline_output {
        let samples: Vec<_> = result.timeline.samples().collect();
        reporting::write_csv(path, &samples)?;
        println!("Timeline written to {path}");
    }
    if let Some(path) = customers_output {
        reporting::write_csv(path, &result.customers)?;
        println!("Customers written to {path}");
    }
    Ok(())
}
