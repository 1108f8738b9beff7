//! Pre-execution trade simulation

pub mod engine;
pub mod risk;

pub use engine::*;
pub use risk::*;
