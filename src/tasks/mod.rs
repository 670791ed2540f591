//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: periodically sweeps expired cache entries

mod cleanup;

pub use cleanup::spawn_cleanup_task;
