#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wayfind_core::config::resolve_config;
use wayfind_sim::campaign::{error_code, format_violation};
use wayfind_sim::{CampaignConfig, CampaignReport, SimulationResult, replay_seed, run_campaign};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "wayfind-sim: seeded shortest-path simulation campaigns",
    long_about = None
)]
struct Cli {
    /// Config file; missing files fall back to defaults.
    #[arg(long, default_value = "wayfind.toml")]
    config: PathBuf,

    /// First seed of the campaign.
    #[arg(long)]
    seed_start: Option<u64>,

    /// Number of seeds to run.
    #[arg(long)]
    seeds: Option<u64>,

    /// Nodes in each initial graph.
    #[arg(long)]
    nodes: Option<usize>,

    /// Edge probability per ordered node pair, in percent.
    #[arg(long)]
    edge_percent: Option<u8>,

    /// Mutation rounds per seed.
    #[arg(long)]
    rounds: Option<u32>,

    /// Replay a single seed round by round instead of running a campaign.
    #[arg(long, value_name = "SEED")]
    replay: Option<u64>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn campaign_config(&self) -> Result<CampaignConfig> {
        let mut file = resolve_config(&self.config)?;
        if let Some(start) = self.seed_start {
            file.sim.seed_start = start;
        }
        if let Some(count) = self.seeds {
            file.sim.seed_count = count;
        }
        if let Some(nodes) = self.nodes {
            file.sim.node_count = nodes;
        }
        if let Some(percent) = self.edge_percent {
            file.sim.edge_percent = percent;
        }
        if let Some(rounds) = self.rounds {
            file.sim.mutation_rounds = rounds;
        }
        Ok(CampaignConfig::from_config(&file))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WAYFIND_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "wayfind=debug,info"
        } else {
            "wayfind=info,warn"
        })
    });

    let format = env::var("WAYFIND_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr)).init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}

fn print_campaign(report: &CampaignReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "campaign complete: seeds={} passed={} rounds={}",
        report.seeds_run, report.seeds_passed, report.rounds_checked
    );
    for failure in &report.failures {
        println!("seed {} failed:", failure.seed);
        for violation in &failure.violations {
            println!("  {violation}");
        }
    }
    if let Some(seed) = report.first_failure {
        println!("replay with: wayfind-sim --replay {seed}");
    }
    Ok(())
}

fn print_replay(result: &SimulationResult, json: bool) -> Result<()> {
    if json {
        let rounds: Vec<_> = result
            .rounds
            .iter()
            .map(|round| {
                serde_json::json!({
                    "round": round.round,
                    "mutations": round.mutations,
                    "source": round.source,
                    "node_count": round.node_count,
                    "edge_count": round.edge_count,
                    "reachable": round.reachable,
                    "passed": round.oracle.passed,
                    "violations": round.oracle.violations.iter().map(format_violation).collect::<Vec<_>>(),
                })
            })
            .collect();
        let out = serde_json::json!({ "seed": result.seed, "passed": result.passed(), "rounds": rounds });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("seed {}", result.seed);
    for round in &result.rounds {
        println!(
            "round {}: source={} nodes={} edges={} reachable={} {}",
            round.round,
            round.source,
            round.node_count,
            round.edge_count,
            round.reachable,
            if round.oracle.passed { "ok" } else { "FAILED" }
        );
        for mutation in &round.mutations {
            println!("  applied {mutation:?}");
        }
        for violation in &round.oracle.violations {
            println!("  {}", format_violation(violation));
        }
    }
    Ok(())
}

/// Print a fatal error, with its code, message and hint when it has one.
fn report_error(err: &anyhow::Error) {
    match error_code(err) {
        Some(code) => {
            eprintln!("error[{code}]: {}", code.message());
            eprintln!("  {err:#}");
            if let Some(hint) = code.hint() {
                eprintln!("  hint: {hint}");
            }
        }
        None => eprintln!("error: {err:#}"),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            report_error(&err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = cli.campaign_config()?;
    debug!(?config, "resolved campaign config");

    let passed = if let Some(seed) = cli.replay {
        let result = replay_seed(seed, &config)?;
        print_replay(&result, cli.json)?;
        result.passed()
    } else {
        let report = run_campaign(&config)?;
        print_campaign(&report, cli.json)?;
        report.all_passed()
    };

    Ok(passed)
}
