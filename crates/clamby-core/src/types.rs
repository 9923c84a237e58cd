//! Domain types shared by the command engine and the facade.

use std::fmt;
use std::str::FromStr;

use crate::error::ClambyError;

/// One of the ClamAV tools this crate is allowed to run.
///
/// The enum is the allow-list: a name that does not parse into an
/// `Executable` can never be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Executable {
    /// Standalone one-shot scanner
    Clamscan,
    /// Client for a running clamd daemon
    Clamdscan,
    /// Signature database updater
    Freshclam,
}

impl Executable {
    /// Every permitted executable
    pub const ALL: [Self; 3] = [Self::Clamscan, Self::Clamdscan, Self::Freshclam];

    /// Conventional command name, also the default configured path
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clamscan => "clamscan",
            Self::Clamdscan => "clamdscan",
            Self::Freshclam => "freshclam",
        }
    }

    /// Scanner to use for the given daemonize setting
    #[must_use]
    pub const fn scanner(daemonize: bool) -> Self {
        if daemonize {
            Self::Clamdscan
        } else {
            Self::Clamscan
        }
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Executable {
    type Err = ClambyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|exe| exe.name() == s)
            .ok_or_else(|| ClambyError::UnpermittedExecutable { name: s.to_string() })
    }
}

/// How the runner should treat a spawned process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Capture output and report whether the engine answered cleanly
    Probe,
    /// Wait for completion and record the exit state only
    #[default]
    Standard,
}

/// What the runner observed about a finished (or never started) process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Process exited with this code
    Code(i32),
    /// Process was terminated by a signal
    Signaled,
    /// Process could not be started at all
    SpawnFailed,
}

impl ExitState {
    /// Exit code, `None` when the status is undetermined
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        match self {
            Self::Code(code) => Some(code),
            Self::Signaled | Self::SpawnFailed => None,
        }
    }

    /// `Some(true)` on exit code 0, `Some(false)` on any other completion,
    /// `None` if the process never ran.
    #[must_use]
    pub const fn success(self) -> Option<bool> {
        match self {
            Self::Code(code) => Some(code == 0),
            Self::Signaled => Some(false),
            Self::SpawnFailed => None,
        }
    }
}

/// Tri-state answer of the version probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// Exited successfully with nothing on stderr
    Available,
    /// Exited unsuccessfully
    Unavailable,
    /// Could not be started, or succeeded while writing to stderr
    Indeterminate,
}

impl ProbeStatus {
    /// Only a clean successful probe counts as the engine being present
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Classified result of a scan that did not raise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Exit status 0
    Clean,
    /// Exit status other than 0 and 2
    Infected {
        /// Exit status reported by the scanner
        status: i32,
    },
    /// Exit status 2: client/transport error, reported as a detection for
    /// backward compatibility
    ClientError,
    /// The scanner's exit status could not be determined
    Indeterminate,
}

impl ScanOutcome {
    /// Legacy boolean: everything except `Clean` counts as a virus
    #[must_use]
    pub const fn is_virus(self) -> bool {
        !matches!(self, Self::Clean)
    }
}
