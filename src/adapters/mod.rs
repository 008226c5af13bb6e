//! Translators from other logging front ends onto [`Logger`](crate::Logger)

pub mod kv;
pub mod log_bridge;

pub use kv::{derive_job_logger, pairs_to_fields, KvLogger};
pub use log_bridge::{init_log_bridge, LogBridge};
