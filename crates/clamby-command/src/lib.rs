//! Command construction, execution and exit-status classification for the
//! ClamAV tools.
//!
//! An operation flows through four steps:
//!
//! 1. [`registry`] checks that the tool is one of `clamscan`, `clamdscan`
//!    or `freshclam` and resolves its configured path
//! 2. [`args`] builds a sorted argument vector from the [`Config`]
//! 3. a [`ProcessRunner`] spawns it and waits
//! 4. [`classify`] turns the exit state into a [`ScanOutcome`] or an error
//!
//! [`Engine`] strings these together.
//!
//! ```rust,ignore
//! use clamby_command::{Engine, SystemRunner};
//! use clamby_core::Config;
//!
//! let config = Config::default();
//! let runner = SystemRunner::new();
//! let outcome = Engine::new(&config, &runner).scan("/tmp/upload.bin")?;
//! ```
//!
//! [`Config`]: clamby_core::Config
//! [`ScanOutcome`]: clamby_core::ScanOutcome

pub mod args;
pub mod classify;
mod engine;
pub mod registry;
mod runner;
pub mod testing;

pub use args::{Invocation, Operation};
pub use engine::Engine;
pub use runner::{ProcessResult, ProcessRunner, SystemRunner};
pub use clamby_core::{ClambyError, Result};
