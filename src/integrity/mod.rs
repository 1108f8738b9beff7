//! Configuration integrity checks

pub mod checker;

pub use checker::*;
