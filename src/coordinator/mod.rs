//! Attempt orchestration from skip check to confirmed execution

pub mod engine;

pub use engine::*;
