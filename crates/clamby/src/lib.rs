//! Scan files with ClamAV and keep its signatures up to date.
//!
//! `clamby` drives the ClamAV command-line tools: `clamscan` (or `clamdscan`
//! when a clamd daemon is running) for scanning and `freshclam` for updates.
//! It never talks to a shell; arguments are passed to the executables as an
//! array.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use clamby::{Clamby, ConfigOptions};
//!
//! fn main() -> clamby::Result<()> {
//!     let mut clamby = Clamby::new();
//!     clamby.configure(ConfigOptions::new().daemonize(true).fdpass(true));
//!
//!     match clamby.is_safe("/tmp/upload.bin")? {
//!         Some(true) => println!("clean"),
//!         Some(false) => println!("infected"),
//!         None => println!("not scanned"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Raise or return
//!
//! The same condition is either an error or a value depending on the
//! configuration:
//!
//! | Condition               | Option                        | Default  |
//! |-------------------------|-------------------------------|----------|
//! | missing file            | `error_file_missing`          | error    |
//! | virus found             | `error_file_virus`            | `true`   |
//! | clamdscan client error  | `error_clamscan_client_error` | `true`   |
//!
//! An executable outside `clamscan`, `clamdscan` and `freshclam` is always
//! an error.

mod client;

pub use client::Clamby;

// Re-export core types
pub use clamby_core::*;

// Lower-level building blocks
pub use clamby_command as command;
pub use clamby_command::{Engine, ProcessRunner, SystemRunner};
