//! Persistence: score file and audit trail

pub mod audit;
pub mod score_store;

pub use audit::*;
pub use score_store::*;
