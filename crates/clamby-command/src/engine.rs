//! Scan, update and probe operations built on the registry, the argument
//! builder, a runner and the classifier.

use std::ffi::OsString;
use std::path::Path;
use tracing::{debug, info, warn};

use clamby_core::{ClambyError, Config, ExecMode, ExitState, ProbeStatus, Result, ScanOutcome};

use crate::args::{self, Invocation, Operation};
use crate::classify;
use crate::registry;
use crate::runner::{ProcessResult, ProcessRunner, SystemRunner};

/// Runs ClamAV operations for one configuration.
///
/// Borrowing both the configuration and the runner keeps an `Engine` cheap
/// to create per call.
#[derive(Debug)]
pub struct Engine<'a, R = SystemRunner> {
    config: &'a Config,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> Engine<'a, R> {
    #[must_use]
    pub const fn new(config: &'a Config, runner: &'a R) -> Self {
        Self { config, runner }
    }

    #[must_use]
    pub const fn config(&self) -> &'a Config {
        self.config
    }

    /// Scan a single file.
    ///
    /// Returns `Ok(None)` without spawning anything when the file is missing
    /// and `error_file_missing` is off.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<Option<ScanOutcome>> {
        let path = path.as_ref();
        if !self.file_exists(path)? {
            return Ok(None);
        }

        let invocation = args::build(Operation::Scan(path), self.config);
        let state = self.execute(&invocation).exit_state();
        classify::classify_scan(path, state, self.config).map(Some)
    }

    /// Update the signature databases with `freshclam`.
    pub fn update(&self) -> ExitState {
        let invocation = args::build(Operation::Update, self.config);
        let state = self.execute(&invocation).exit_state();
        info!(?state, "signature update finished");
        state
    }

    /// Run the scanner with `--version` to see whether it works.
    pub fn version(&self) -> ProbeStatus {
        let invocation = args::build(Operation::Version, self.config);
        let status = self.execute(&invocation).probe_status();
        debug!(?status, "scanner probe finished");
        status
    }

    /// Run a permitted tool by name with extra arguments.
    ///
    /// The default flags are added and everything is sorted, as for the
    /// built-in operations.
    pub fn run<I, S>(&self, name: &str, args: I) -> Result<ExitState>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let (executable, _) = registry::resolve(name, self.config)?;
        let invocation = Invocation::new(executable, args, ExecMode::Standard, self.config);
        Ok(self.execute(&invocation).exit_state())
    }

    fn execute(&self, invocation: &Invocation) -> ProcessResult {
        debug!(
            program = invocation.program(),
            args = ?invocation.args(),
            mode = ?invocation.mode(),
            "running ClamAV command"
        );
        self.runner.run(invocation)
    }

    fn file_exists(&self, path: &Path) -> Result<bool> {
        if path.is_file() {
            return Ok(true);
        }

        if self.config.error_file_missing {
            return Err(ClambyError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        warn!(path = %path.display(), "file not found, skipping scan");
        Ok(false)
    }
}
