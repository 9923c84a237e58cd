//! Process execution.

use std::process::{Command, ExitStatus, Stdio};
use tracing::warn;

use clamby_core::{ExecMode, ExitState, ProbeStatus};

use crate::args::Invocation;
use crate::classify;

/// What a runner reports back for an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// A `Standard` run finished (or failed to start)
    Exited(ExitState),
    /// A `Probe` run was evaluated
    Probed(ProbeStatus),
}

impl ProcessResult {
    /// Exit state of a standard run.
    ///
    /// A probe result carries no exit code and is reported as undetermined.
    #[must_use]
    pub const fn exit_state(self) -> ExitState {
        match self {
            Self::Exited(state) => state,
            Self::Probed(_) => ExitState::SpawnFailed,
        }
    }

    /// Probe status of a probe run.
    ///
    /// A standard run is mapped onto the probe states by its exit state.
    #[must_use]
    pub const fn probe_status(self) -> ProbeStatus {
        match self {
            Self::Probed(status) => status,
            Self::Exited(ExitState::Code(0)) => ProbeStatus::Available,
            Self::Exited(ExitState::Code(_) | ExitState::Signaled) => ProbeStatus::Unavailable,
            Self::Exited(ExitState::SpawnFailed) => ProbeStatus::Indeterminate,
        }
    }
}

/// Runs invocations as child processes.
///
/// Every call blocks until the child exits. Implementations must not fail:
/// a process that cannot be started is reported as
/// [`ExitState::SpawnFailed`] or [`ProbeStatus::Indeterminate`].
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> ProcessResult;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, invocation: &Invocation) -> ProcessResult {
        (**self).run(invocation)
    }
}

/// Spawns the real executables with `std::process::Command`.
///
/// Arguments are handed to the OS as an array; no shell is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(invocation.program());
        command.args(invocation.args()).stdin(Stdio::null());
        command
    }

    fn probe(invocation: &Invocation) -> ProbeStatus {
        match Self::command(invocation).output() {
            Ok(output) => classify::probe_status(output.status.success(), &output.stderr),
            Err(e) => {
                warn!(program = invocation.program(), error = %e, "failed to start ClamAV probe");
                ProbeStatus::Indeterminate
            }
        }
    }

    fn wait(invocation: &Invocation) -> ExitState {
        let mut command = Self::command(invocation);
        if invocation.discard_stdout() {
            command.stdout(Stdio::null());
        }

        match command.status() {
            Ok(status) => exit_state(status),
            Err(e) => {
                warn!(program = invocation.program(), error = %e, "failed to start ClamAV command");
                ExitState::SpawnFailed
            }
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> ProcessResult {
        match invocation.mode() {
            ExecMode::Probe => ProcessResult::Probed(Self::probe(invocation)),
            ExecMode::Standard => ProcessResult::Exited(Self::wait(invocation)),
        }
    }
}

fn exit_state(status: ExitStatus) -> ExitState {
    status.code().map_or(ExitState::Signaled, ExitState::Code)
}
