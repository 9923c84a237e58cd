//! Mapping process results onto scan outcomes.

use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};

use clamby_core::{ClambyError, Config, ExitState, ProbeStatus, Result, ScanOutcome};

/// Exit status clamdscan uses for every error that is not a detection
pub const CLIENT_ERROR_STATUS: i32 = 2;

/// Classify the exit state of a scan.
///
/// | exit state            | outcome                                              |
/// |-----------------------|------------------------------------------------------|
/// | `0`                   | `Clean`                                              |
/// | `2`, signal, no spawn | `ClamscanClientError` in daemon mode when configured,|
/// |                       | otherwise `ClientError` / `Indeterminate`            |
/// | anything else         | `VirusDetected` when configured, else `Infected`     |
///
/// The client-error band is reported as a detection unless configured to
/// raise; callers relying on `true` for status 2 depend on this.
pub fn classify_scan(path: &Path, state: ExitState, config: &Config) -> Result<ScanOutcome> {
    match state.code() {
        Some(0) => {
            info!(path = %path.display(), "scan clean");
            Ok(ScanOutcome::Clean)
        }
        None | Some(CLIENT_ERROR_STATUS) => {
            if config.daemonize && config.error_clamscan_client_error {
                return Err(ClambyError::ClamscanClientError {
                    status: state.code(),
                });
            }

            warn!(path = %path.display(), ?state, "scanner did not give a verdict, reporting as infected");
            Ok(if state.code().is_some() {
                ScanOutcome::ClientError
            } else {
                ScanOutcome::Indeterminate
            })
        }
        Some(status) => {
            if config.error_file_virus {
                return Err(ClambyError::VirusDetected {
                    path: path.to_path_buf(),
                    detected_at: Utc::now(),
                });
            }

            warn!(path = %path.display(), status, "virus detected");
            Ok(ScanOutcome::Infected { status })
        }
    }
}

/// Evaluate a finished version probe.
///
/// A successful exit that still wrote to stderr is neither a clear yes nor
/// a clear no, and is reported as `Indeterminate`.
#[must_use]
pub const fn probe_status(success: bool, stderr: &[u8]) -> ProbeStatus {
    match (success, stderr.is_empty()) {
        (true, true) => ProbeStatus::Available,
        (true, false) => ProbeStatus::Indeterminate,
        (false, _) => ProbeStatus::Unavailable,
    }
}
