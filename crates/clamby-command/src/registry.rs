//! Executable allow-list and path resolution.

use clamby_core::{Config, Executable, Result};

/// Resolve a tool name to its configured path.
///
/// Fails with `UnpermittedExecutable` unless `name` is one of
/// `clamscan`, `clamdscan` or `freshclam`.
pub fn resolve<'c>(name: &str, config: &'c Config) -> Result<(Executable, &'c str)> {
    let executable: Executable = name.parse()?;
    Ok((executable, path_for(executable, config)))
}

/// Configured path for an executable that is already known to be permitted.
#[must_use]
pub fn path_for(executable: Executable, config: &Config) -> &str {
    config.executable_path(executable)
}
