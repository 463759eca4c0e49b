//! # Core Module
//!
//! Configuration and the wall clock shared by the foreground assistant and
//! the standby service.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//! - **Toggleable**: false

pub mod clock;
pub mod config;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, FileConfig};
