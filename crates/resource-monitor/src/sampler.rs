use chrono::{Local, SecondsFormat};
use std::io::Write;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::docker;
use crate::error::{MonitorError, Result};
use crate::procfs;

/// A source of CSV rows.
pub trait Sampler {
    fn header(&self) -> &'static str;

    /// Columns after the timestamp. `Ok(None)` skips this tick; an error ends
    /// the run (the target went away).
    fn sample(&mut self) -> Result<Option<String>>;
}

/// Print the header, then one row per interval until the sampler fails.
pub fn run<S: Sampler, W: Write>(sampler: &mut S, interval: Duration, out: &mut W) -> Result<()> {
    writeln!(out, "Timestamp,{}", sampler.header())?;
    out.flush()?;

    loop {
        sleep(interval);

        match sampler.sample() {
            Ok(Some(row)) => {
                let now = Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
                writeln!(out, "{},{}", now, row)?;
                out.flush()?;
            }
            Ok(None) => debug!("Sample skipped"),
            Err(e) => {
                info!("Stopping: {}", e);
                return Ok(());
            }
        }
    }
}

/// CPU cores and RSS of one process, from `/proc/<pid>`.
pub struct ProcessSampler {
    status_path: String,
    stat_path: String,
    ticks_per_second: f64,
    last_ticks: u64,
    last_at: Instant,
}

impl ProcessSampler {
    pub fn new(pid: u32) -> Result<Self> {
        let stat_path = format!("/proc/{}/stat", pid);
        let stat = procfs::read_file(&stat_path)?;
        let last_ticks = procfs::parse_stat_cpu_ticks(&stat)
            .ok_or_else(|| MonitorError::Format(stat_path.clone()))?;

        Ok(Self {
            status_path: format!("/proc/{}/status", pid),
            stat_path,
            ticks_per_second: procfs::clock_ticks(),
            last_ticks,
            last_at: Instant::now(),
        })
    }
}

impl Sampler for ProcessSampler {
    fn header(&self) -> &'static str {
        "CPUCores,MemoryMB"
    }

    fn sample(&mut self) -> Result<Option<String>> {
        let status = procfs::read_file(&self.status_path)?;
        let rss_mb = procfs::parse_vm_rss_kb(&status).unwrap_or(0.0) / 1024.0;

        let stat = procfs::read_file(&self.stat_path)?;
        let Some(ticks) = procfs::parse_stat_cpu_ticks(&stat) else {
            return Ok(None);
        };

        let now = Instant::now();
        let wall = now.duration_since(self.last_at).as_secs_f64();
        let cpu = ticks.saturating_sub(self.last_ticks) as f64 / self.ticks_per_second;
        let cores = if wall > 0.0 { cpu / wall } else { 0.0 };

        self.last_ticks = ticks;
        self.last_at = now;

        Ok(Some(format!("{:.4},{:.2}", cores, rss_mb)))
    }
}

/// Host-wide cores in use, from the aggregate line of `/proc/stat`.
pub struct SystemSampler {
    cpus: f64,
    last: procfs::CpuTimes,
}

impl SystemSampler {
    pub fn new() -> Result<Self> {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1) as f64;
        Ok(Self {
            cpus,
            last: procfs::read_system_cpu()?,
        })
    }
}

impl Sampler for SystemSampler {
    fn header(&self) -> &'static str {
        "TotalSystemCoresUsed"
    }

    fn sample(&mut self) -> Result<Option<String>> {
        let current = procfs::read_system_cpu()?;
        let cores = current.busy_fraction_since(&self.last) * self.cpus;
        self.last = current;
        Ok(Some(format!("{:.4}", cores)))
    }
}

/// `docker stats` for one container, or the sum over several.
pub struct ContainerSampler {
    containers: Vec<String>,
}

impl ContainerSampler {
    pub fn new(containers: Vec<String>) -> Self {
        Self { containers }
    }
}

impl Sampler for ContainerSampler {
    fn header(&self) -> &'static str {
        if self.containers.len() > 1 {
            "TotalCPUCores,TotalMemoryMB"
        } else {
            "CPUCores,MemoryMB"
        }
    }

    fn sample(&mut self) -> Result<Option<String>> {
        let usages = docker::stats(&self.containers)?;
        if usages.is_empty() {
            return Err(MonitorError::Command {
                command: "docker stats".to_string(),
                reason: "no containers reported".to_string(),
            });
        }
        let cpu: f64 = usages.iter().map(|u| u.cpu_cores).sum();
        let mem: f64 = usages.iter().map(|u| u.memory_mb).sum();
        Ok(Some(format!("{:.4},{:.2}", cpu, mem)))
    }
}
