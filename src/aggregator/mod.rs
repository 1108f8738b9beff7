//! Multi-source price aggregation

pub mod spread;

pub use spread::*;
