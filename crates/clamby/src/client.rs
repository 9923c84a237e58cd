//! The [`Clamby`] facade.

use std::path::Path;
use tracing::debug;

use clamby_command::{Engine, ProcessRunner, SystemRunner};
use clamby_core::{Config, ConfigOptions, ExitState, Result, ScanOutcome};

/// Scans files with ClamAV under one configuration.
///
/// The configuration lives in this value rather than in process-wide state;
/// create one per set of options, or reconfigure with [`Clamby::configure`].
#[derive(Debug, Clone, Default)]
pub struct Clamby<R = SystemRunner> {
    config: Config,
    runner: R,
}

impl Clamby {
    /// Default configuration, real executables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Given configuration, real executables
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_runner(config, SystemRunner::new())
    }

    /// Load the configuration from a TOML file (defaults if it does not exist)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_config(Config::load(path.as_ref())?))
    }
}

impl<R: ProcessRunner> Clamby<R> {
    /// Use a custom runner, e.g. [`clamby_command::testing::FakeRunner`]
    #[must_use]
    pub const fn with_runner(config: Config, runner: R) -> Self {
        Self { config, runner }
    }

    /// Merge options into the current configuration.
    ///
    /// The deprecated `silence_output` option sets `output_level` to `off`
    /// and logs a warning once per calling location.
    #[track_caller]
    pub fn configure(&mut self, options: ConfigOptions) -> &mut Self {
        self.config.merge(options);
        debug!(config = ?self.config, "configuration updated");
        self
    }

    /// Merge a loosely typed option map; unknown keys are ignored.
    #[track_caller]
    pub fn configure_json(&mut self, options: serde_json::Value) -> Result<&mut Self> {
        let options = ConfigOptions::from_json(options)?;
        Ok(self.configure(options))
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Lower-level access to the individual operations
    #[must_use]
    pub const fn engine(&self) -> Engine<'_, R> {
        Engine::new(&self.config, &self.runner)
    }

    /// Whether the scanner responds, skipped when `check` is off
    pub fn scanner_exists(&self) -> bool {
        if !self.config.check {
            return true;
        }
        self.engine().version().is_available()
    }

    /// Scan `path` and return the classified outcome.
    ///
    /// `Ok(None)` when the scanner is unavailable, or when the file is
    /// missing and `error_file_missing` is off.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<Option<ScanOutcome>> {
        if !self.scanner_exists() {
            debug!("scanner unavailable, not scanning");
            return Ok(None);
        }
        self.engine().scan(path)
    }

    /// `Some(true)` if the file is (or may be) infected, `Some(false)` if
    /// clean, `None` if no scan took place.
    pub fn is_virus(&self, path: impl AsRef<Path>) -> Result<Option<bool>> {
        Ok(self.scan(path)?.map(ScanOutcome::is_virus))
    }

    /// Negation of [`Clamby::is_virus`], keeping `None` and errors.
    pub fn is_safe(&self, path: impl AsRef<Path>) -> Result<Option<bool>> {
        Ok(self.is_virus(path)?.map(|virus| !virus))
    }

    /// Run `freshclam` and pass its exit state through
    pub fn update(&self) -> ExitState {
        self.engine().update()
    }

    /// Whether scans go through `clamdscan`
    #[must_use]
    pub const fn is_daemonized(&self) -> bool {
        self.config.daemonize
    }
}
