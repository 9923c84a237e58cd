//! A scripted [`ProcessRunner`] for exercising scan logic without ClamAV.

use std::cell::RefCell;

use clamby_core::{ExecMode, ExitState, ProbeStatus};

use crate::args::Invocation;
use crate::runner::{ProcessResult, ProcessRunner};

/// Answers every probe and every standard run with a fixed result and
/// records what it was asked to run.
#[derive(Debug)]
pub struct FakeRunner {
    probe: ProbeStatus,
    exit: ExitState,
    invocations: RefCell<Vec<Invocation>>,
}

impl FakeRunner {
    #[must_use]
    pub const fn new(probe: ProbeStatus, exit: ExitState) -> Self {
        Self {
            probe,
            exit,
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Scanner is available and every run exits with `code`
    #[must_use]
    pub const fn exiting(code: i32) -> Self {
        Self::new(ProbeStatus::Available, ExitState::Code(code))
    }

    /// Everything run so far, oldest first
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Standard-mode runs only
    #[must_use]
    pub fn standard_runs(&self) -> Vec<Invocation> {
        self.invocations
            .borrow()
            .iter()
            .filter(|invocation| invocation.mode() == ExecMode::Standard)
            .cloned()
            .collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> ProcessResult {
        self.invocations.borrow_mut().push(invocation.clone());
        match invocation.mode() {
            ExecMode::Probe => ProcessResult::Probed(self.probe),
            ExecMode::Standard => ProcessResult::Exited(self.exit),
        }
    }
}
