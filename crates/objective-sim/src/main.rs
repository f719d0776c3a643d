//! objective-sim - headless driver for the ai-objective scheduler.
//!
//! Runs one worker through a fetch errand with a patrol to fall back on, optionally interrupted
//! by a pinned rally order, and prints the lifecycle trace.

mod demo;

use std::path::{Path, PathBuf};

use ai_objective::{ObjectiveManager, SchedulerConfig, TickContext, TraceLog, VecTraceSink};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "objective-sim")]
#[command(about = "Tick a demo agent through its objective tree", version)]
struct Cli {
    /// Scheduler config (YAML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 30)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0)]
    dt: f32,

    /// Pin a rally order at this tick
    #[arg(long)]
    order_at: Option<u64>,

    /// Where the rally order sends the worker
    #[arg(long, default_value_t = -5, allow_hyphen_values = true)]
    rally_to: i32,

    /// Verbose output (also enables scheduler diagnostics)
    #[arg(short, long)]
    verbose: bool,

    /// Print the trace as JSON instead of one line per event
    #[arg(long)]
    trace_json: bool,
}

fn load_config(path: Option<&Path>) -> Result<SchedulerConfig> {
    let Some(path) = path else {
        return Ok(SchedulerConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: SchedulerConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid scheduler config in {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.verbose {
        config = config.with_verbose_diagnostics(true);
    }

    let agent: demo::Agent = 1;
    let mut world = demo::Village::default();
    let mut manager = ObjectiveManager::new(agent, config);
    manager
        .add_objective(demo::patrol(agent))
        .context("Failed to schedule patrol")?;
    manager
        .add_objective(demo::fetch(agent))
        .context("Failed to schedule fetch")?;

    let mut sink = VecTraceSink::default();
    let mut tick = TickContext::new(0, cli.dt);
    for _ in 0..cli.ticks {
        if cli.order_at == Some(tick.tick) {
            tracing::info!(tick = tick.tick, target = cli.rally_to, "rally order issued");
            manager.set_order(demo::rally(agent, cli.rally_to));
        }
        manager.tick(tick, &mut world, &mut sink);
        tick = tick.next();
    }

    tracing::info!(
        ticks = cli.ticks,
        position = world.position,
        pantry = world.pantry,
        roots = manager.objectives().len(),
        "simulation finished"
    );

    let log = TraceLog::from(sink);
    if cli.trace_json {
        let json = serde_json::to_string_pretty(&log).context("Failed to serialize trace")?;
        println!("{json}");
    } else {
        print_trace(&log);
    }

    Ok(())
}

fn print_trace(log: &TraceLog) {
    for event in &log.events {
        println!(
            "tick {:>4}  agent {}  #{:<4} {:<8} {:?}",
            event.tick, event.agent, event.objective, event.kind, event.event
        );
    }
}
