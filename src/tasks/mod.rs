//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: drops cached payloads past their expiry backstop

mod cleanup;

pub use cleanup::spawn_cleanup_task;
