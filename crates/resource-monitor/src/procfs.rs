use std::fs;

use crate::error::{MonitorError, Result};

const DEFAULT_CLK_TCK: f64 = 100.0;

pub fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|source| MonitorError::Unreadable {
        path: path.to_string(),
        source,
    })
}

/// Clock ticks per second (`sysconf(_SC_CLK_TCK)`), 100 if unknown.
pub fn clock_ticks() -> f64 {
    // SAFETY: sysconf has no preconditions.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks <= 0 {
        tracing::warn!("Could not determine system clock ticks. Defaulting to 100.");
        DEFAULT_CLK_TCK
    } else {
        ticks as f64
    }
}

/// `VmRSS` from `/proc/<pid>/status`, in kB. Kernel threads have none.
pub fn parse_vm_rss_kb(status: &str) -> Option<f64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|v| v.parse().ok())
}

/// `utime + stime` (fields 14 and 15) from `/proc/<pid>/stat`, in ticks.
///
/// Field 2 is the command name in parentheses and may contain spaces, so
/// counting restarts after the last `)`, at field 3.
pub fn parse_stat_cpu_ticks(stat: &str) -> Option<u64> {
    let rest = &stat[stat.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let utime: u64 = fields.get(14 - 3)?.parse().ok()?;
    let stime: u64 = fields.get(15 - 3)?.parse().ok()?;
    Some(utime + stime)
}

/// Aggregate `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuTimes {
    pub user: f64,
    pub nice: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
    pub guest_nice: f64,
}

impl CpuTimes {
    pub fn busy(&self) -> f64 {
        self.user
            + self.nice
            + self.system
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
            + self.guest_nice
    }

    pub fn idle_total(&self) -> f64 {
        self.idle + self.iowait
    }

    pub fn total(&self) -> f64 {
        self.busy() + self.idle_total()
    }

    /// Busy share of elapsed time between two readings, 0.0..=1.0.
    pub fn busy_fraction_since(&self, earlier: &CpuTimes) -> f64 {
        let total = self.total() - earlier.total();
        if total <= 0.0 {
            return 0.0;
        }
        let idle = self.idle_total() - earlier.idle_total();
        ((total - idle) / total).clamp(0.0, 1.0)
    }
}

pub fn parse_system_cpu(stat: &str) -> Option<CpuTimes> {
    let fields: Vec<&str> = stat.lines().next()?.split_whitespace().collect();
    if fields.len() < 8 || fields[0] != "cpu" {
        return None;
    }
    // steal / guest / guest_nice are absent on older kernels
    let field = |i: usize| -> f64 {
        fields
            .get(i)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    };
    Some(CpuTimes {
        user: field(1),
        nice: field(2),
        system: field(3),
        idle: field(4),
        iowait: field(5),
        irq: field(6),
        softirq: field(7),
        steal: field(8),
        guest: field(9),
        guest_nice: field(10),
    })
}

pub fn read_system_cpu() -> Result<CpuTimes> {
    let s = read_file("/proc/stat")?;
    parse_system_cpu(&s).ok_or_else(|| MonitorError::Format("/proc/stat".to_string()))
}
