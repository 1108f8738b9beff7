//! Utility functions and helpers

pub mod display;
pub mod logging;

pub use display::*;
pub use logging::*;
