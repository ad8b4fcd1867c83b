use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use resource_monitor::sampler::{self, ContainerSampler, ProcessSampler, SystemSampler};

#[derive(Parser)]
#[command(name = "resource-monitor")]
#[command(about = "Sample CPU cores and memory once per interval as CSV", long_about = None)]
struct Cli {
    /// Sampling interval in milliseconds
    #[arg(long, global = true, default_value_t = 1000)]
    interval_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One process, from /proc/<PID>
    Process {
        pid: u32,
    },
    /// One or more containers via `docker stats` (several are summed)
    Container {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// The whole host, from /proc/stat
    System,
}

fn main() -> Result<()> {
    // stdout carries the CSV
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let interval = Duration::from_millis(cli.interval_ms.max(1));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Process { pid } => {
            let mut s = ProcessSampler::new(pid)?;
            sampler::run(&mut s, interval, &mut out)?;
        }
        Commands::Container { names } => {
            let mut s = ContainerSampler::new(names);
            sampler::run(&mut s, interval, &mut out)?;
        }
        Commands::System => {
            let mut s = SystemSampler::new()?;
            sampler::run(&mut s, interval, &mut out)?;
        }
    }

    Ok(())
}
