//! CSV resource samplers used alongside the workload server.
//!
//! Every sampler prints a header and then one row per interval to stdout
//! until its target disappears or becomes unreadable.

pub mod docker;
pub mod error;
pub mod procfs;
pub mod sampler;

pub use error::{MonitorError, Result};
pub use sampler::{ContainerSampler, ProcessSampler, Sampler, SystemSampler};
