//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cleanup: sweeps expired cache entries and idle rate-limiter users

mod cleanup;

pub use cleanup::spawn_cleanup_task;
