//! Core data types and structures

pub mod quotes;
pub mod flashloan;
pub mod simulation;
pub mod scoring;
pub mod integrity;
pub mod execution;

pub use quotes::*;
pub use flashloan::*;
pub use simulation::*;
pub use scoring::*;
pub use integrity::*;
pub use execution::*;
