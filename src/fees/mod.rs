//! Flash-loan fee optimization

pub mod optimizer;

pub use optimizer::*;
