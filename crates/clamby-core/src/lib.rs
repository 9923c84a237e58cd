//! Core types for the clamby ClamAV facade.
//!
//! This crate provides the foundational pieces shared by the command engine
//! and the facade:
//!
//! - **Configuration**: [`Config`] with its defaults, and [`ConfigOptions`]
//!   for partial updates
//! - **Types**: the executable allow-list ([`Executable`]) and the values a
//!   run can produce ([`ExitState`], [`ProbeStatus`], [`ScanOutcome`])
//! - **Errors**: [`ClambyError`] and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use clamby_core::{Config, ConfigOptions, OutputLevel};
//!
//! let config = Config::default().merged(
//!     ConfigOptions::new()
//!         .daemonize(true)
//!         .output_level(OutputLevel::Low),
//! );
//! assert!(config.daemonize);
//! ```

mod config;
mod error;
mod types;

pub use config::{Config, ConfigOptions, OutputLevel};
pub use error::{ClambyError, Result};
pub use types::*;
