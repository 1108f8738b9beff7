//! Per-pair outcome history and loss-streak skipping

pub mod memory;

pub use memory::*;
