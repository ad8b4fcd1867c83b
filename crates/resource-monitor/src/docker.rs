use std::process::Command;

use crate::error::{MonitorError, Result};

/// `docker stats` output template: `<cpu%>;<used> / <limit>`.
pub const STATS_FORMAT: &str = "{{.CPUPerc}};{{.MemUsage}}";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerUsage {
    pub cpu_cores: f64,
    pub memory_mb: f64,
}

/// `"12.5%"` -> 0.125 cores. `"--"` (container starting) reads as 0.
pub fn parse_cpu_cores(s: &str) -> Result<f64> {
    let s = s.trim();
    if s == "--" {
        return Ok(0.0);
    }
    let pct: f64 = s
        .trim_end_matches('%')
        .trim()
        .parse()
        .map_err(|_| MonitorError::Format(format!("cpu percentage {:?}", s)))?;
    Ok(pct / 100.0)
}

/// Byte-suffixed size (`512KiB`, `1.5GiB`, `12MB`, `900B`) -> megabytes (MiB).
pub fn parse_size_mb(s: &str) -> Result<f64> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| MonitorError::Size(s.to_string()))?;
    let (number, unit) = s.split_at(split);
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| MonitorError::Size(s.to_string()))?;

    let bytes = match unit {
        "B" => value,
        "KiB" => value * 1024.0,
        "kB" | "KB" => value * 1000.0,
        "MiB" => value * 1024.0 * 1024.0,
        "MB" => value * 1000.0 * 1000.0,
        "GiB" => value * 1024.0 * 1024.0 * 1024.0,
        "GB" => value * 1000.0 * 1000.0 * 1000.0,
        _ => return Err(MonitorError::Size(s.to_string())),
    };
    Ok(bytes / (1024.0 * 1024.0))
}

/// One line of `docker stats --format STATS_FORMAT`.
pub fn parse_stats_line(line: &str) -> Result<ContainerUsage> {
    let (cpu, mem) = line
        .split_once(';')
        .ok_or_else(|| MonitorError::Format(format!("docker stats line {:?}", line)))?;
    let used = mem.split('/').next().unwrap_or(mem);
    Ok(ContainerUsage {
        cpu_cores: parse_cpu_cores(cpu)?,
        memory_mb: parse_size_mb(used)?,
    })
}

/// Snapshot of the named containers. Fails when docker exits non-zero, which
/// is also what happens once a container is gone.
pub fn stats(containers: &[String]) -> Result<Vec<ContainerUsage>> {
    let output = Command::new("docker")
        .args(["stats", "--no-stream", "--format", STATS_FORMAT])
        .args(containers)
        .output()
        .map_err(|e| MonitorError::Command {
            command: "docker stats".to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(MonitorError::Command {
            command: "docker stats".to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(parse_stats_line)
        .collect()
}
