//! Synthetic per-request CPU and memory load.

pub mod arena;
pub mod generator;

pub use arena::MemoryArena;
pub use generator::LoadGenerator;
