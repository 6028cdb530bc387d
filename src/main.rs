use std::io::Read;

use anyhow::Context;
use average::Estimate;
use clap::{Parser, Subcommand};
use rand::prelude::*;
use sched_race::{ProcessDescriptor, Race, RaceConfig, SchedEvent, SimulationRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sched-race")]
#[command(about = "Race processes under preemptive priority scheduling and print the Gantt chart")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Simulated seconds per step (overrides the configuration)
    #[arg(short, long, global = true)]
    delta: Option<f64>,

    /// Chart width in columns (overrides the configuration)
    #[arg(short, long, global = true)]
    width: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Race an explicit process set
    Run {
        #[arg(long, value_delimiter = ',', required = true)]
        arrivals: Vec<f64>,

        #[arg(long, value_delimiter = ',', required = true)]
        bursts: Vec<f64>,

        #[arg(long, value_delimiter = ',', required = true)]
        priorities: Vec<f64>,

        /// Process names (defaults to P1..Pn)
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,
    },

    /// Race the processes described by a request text ("-" reads stdin)
    Request { text: String },

    /// Race a random workload with Bernoulli arrivals
    Random {
        #[arg(long, default_value = "20")]
        ticks: u64,

        #[arg(long, default_value = "0.3")]
        p_arrival: f64,

        #[arg(long, default_value = "0.3")]
        p_short: f64,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RaceConfig::from_file(path)?,
        None => RaceConfig::default(),
    };
    if let Some(delta) = cli.delta {
        config.tick_delta = delta;
    }
    if let Some(width) = cli.width {
        config.chart.width = width;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let descriptors = match cli.command {
        Commands::Run {
            arrivals,
            bursts,
            priorities,
            names,
        } => {
            let mut descriptors =
                SimulationRequest::from_lists(arrivals, bursts, priorities)?.descriptors()?;
            if !names.is_empty() {
                anyhow::ensure!(
                    names.len() == descriptors.len(),
                    "expected {} names, got {}",
                    descriptors.len(),
                    names.len()
                );
                for (descriptor, name) in descriptors.iter_mut().zip(names) {
                    descriptor.name = name;
                }
            }
            descriptors
        }
        Commands::Request { text } => {
            let text = if text == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("reading request from stdin")?;
                buf
            } else {
                text
            };
            SimulationRequest::parse(&text)?.descriptors()?
        }
        Commands::Random {
            ticks,
            p_arrival,
            p_short,
            seed,
        } => bernoulli_processes(ticks, p_arrival, p_short, 1.0, 4.0, seed),
    };
    anyhow::ensure!(!descriptors.is_empty(), "workload produced no processes");

    let mut race: Race = Race::new(descriptors, &config)?;

    while !race.is_complete() {
        let report = race.step(config.tick_delta)?;
        for event in &report.events {
            match event {
                SchedEvent::Admitted { .. } | SchedEvent::CpuIdle { .. } => {
                    tracing::trace!("t={:.3} {:?}", report.now, event)
                }
                _ => tracing::debug!("t={:.3} {:?}", report.now, event),
            }
        }
    }

    match race.chart() {
        Ok(chart) => {
            println!("{chart}");
            for line in chart.timeline() {
                println!("{line}");
            }
        }
        Err(e) if e.is_degenerate() => println!("Nothing to display"),
        Err(e) => return Err(e.into()),
    }

    let response_times = race.processes_map(|p| p.response_time());
    let waiting_times = race.processes_map(|p| p.waiting_time());
    let turnaround_times = race.processes_map(|p| p.turnaround_time());

    println!();
    println!("Average response time: {:.2}s", avg(response_times));
    println!("Average waiting time: {:.2}s", avg(waiting_times));
    println!("Average turnaround time: {:.2}s", avg(turnaround_times));

    Ok(())
}

fn bernoulli_processes(
    ticks: u64,
    p_arrival: f64,
    p_short: f64,
    short_burst: f64,
    long_burst: f64,
    seed: u64,
) -> Vec<ProcessDescriptor> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();

    for t in 0..ticks {
        if rng.random::<f64>() < p_arrival {
            let burst_time = if rng.random::<f64>() < p_short {
                short_burst
            } else {
                long_burst
            };
            let priority = rng.random_range(1..=5) as f64;

            processes.push(ProcessDescriptor::new(
                format!("P{}", processes.len() + 1),
                t as f64,
                burst_time,
                priority,
            ));
        }
    }

    processes
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<average::Mean>().estimate()
}
