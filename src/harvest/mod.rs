//! The incremental harvesting engine: task construction, dispatch and merge.

pub mod engine;
pub mod error;
pub mod executor;
pub mod merge;
pub mod outcome;
pub mod readings;
pub mod retry;
pub mod task;
