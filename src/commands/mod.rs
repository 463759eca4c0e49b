//! # Command System
//!
//! Wake-word gated text commands for the assistant.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Ordered pattern table producing tagged commands, reminder replies
//! - 2.0.0: Single handler entry point returning reply text
//! - 1.0.0: Initial command parsing

pub mod handler;
pub mod parser;

pub use handler::{format_active, CommandHandler};
pub use parser::{parse, parse_body, strip_wake_word, Command};
