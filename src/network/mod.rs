//! Network helpers shared by the HTTP adapters

pub mod retry;

pub use retry::*;
