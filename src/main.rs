/*
SPDX-FileCopyrightText: Copyright 2026 finsched contributors
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

use finsched::policy::{simulate, Policy};
use finsched::task::ScheduleResult;
use finsched::workload;

// ── CLI argument definition ───────────────────────────────────────────────────

/// finsched scheduling-policy simulator.
///
/// Example:
///   finsched --workload workloads/example_tasks.yaml --policy round-robin -q 2
#[derive(Debug, Parser)]
#[command(
    name = "finsched",
    about = "Deterministic scheduling-policy simulator for financial task workloads",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML workload file.
    #[arg(short = 'w', long = "workload")]
    workload: PathBuf,

    /// Scheduling policy to simulate.
    #[arg(short = 'p', long = "policy", value_enum)]
    policy: PolicyArg,

    /// Time quantum for round-robin (ignored by other policies).
    #[arg(short = 'q', long = "quantum", default_value_t = 2.0)]
    quantum: f64,

    /// Market volatility in [0.0, 1.0] for PBPM (ignored by other policies).
    #[arg(short = 'm', long = "volatility", default_value_t = 0.5)]
    volatility: f64,

    /// Emit the result as JSON instead of a table.
    #[arg(long = "json", default_value_t = false)]
    json: bool,
}

/// CLI-facing policy names.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin,
    Priority,
    Pbpm,
}

impl PolicyArg {
    /// Attach the relevant numeric parameter and build the engine-side
    /// policy.
    fn to_policy(self, cli: &Cli) -> Policy {
        match self {
            PolicyArg::Fcfs => Policy::Fcfs,
            PolicyArg::Sjf => Policy::Sjf,
            PolicyArg::Srtf => Policy::Srtf,
            PolicyArg::RoundRobin => Policy::RoundRobin {
                time_quantum: cli.quantum,
            },
            PolicyArg::Priority => Policy::Priority,
            PolicyArg::Pbpm => Policy::Pbpm {
                market_volatility: cli.volatility,
            },
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Print the timeline as an aligned table plus the summary metric.
fn print_table(result: &ScheduleResult) {
    println!("{:<20} {:>10} {:>10}", "task", "start", "duration");
    for entry in &result.schedule {
        println!(
            "{:<20} {:>10.2} {:>10.2}",
            entry.task_name, entry.start_time, entry.duration
        );
    }
    println!();
    println!("Makespan:             {:.2}", result.makespan());
    println!("Average waiting time: {:.2}", result.average_waiting_time);
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        workload = %cli.workload.display(),
        policy = ?cli.policy,
        quantum = cli.quantum,
        volatility = cli.volatility,
        "configuration"
    );

    let tasks = match workload::load_from_file(&cli.workload) {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("failed to load workload: {:#}", e);
            process::exit(1);
        }
    };

    let policy = cli.policy.to_policy(&cli);
    let result = match simulate(tasks, policy) {
        Ok(result) => result,
        Err(e) => {
            error!("simulation rejected: {e}");
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("failed to serialise result: {e}");
                process::exit(1);
            }
        }
    } else {
        print_table(&result);
    }
}
