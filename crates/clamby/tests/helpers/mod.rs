//! Shared fixtures for the clamby integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// A regular file with harmless content
pub fn good_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "This is a harmless test file.").unwrap();
    file.flush().unwrap();
    file
}

/// A path that does not exist
pub fn bad_path() -> PathBuf {
    PathBuf::from("/nonexistent/clamby/missing_file.txt")
}

/// Directory of fake ClamAV executables written as shell scripts
#[cfg(unix)]
pub struct FakeTools {
    dir: TempDir,
}

#[cfg(unix)]
impl FakeTools {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write an executable script named `name` and return its path
    pub fn script(&self, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    /// Script that answers `--version` cleanly and otherwise exits with
    /// `code`, logging its arguments one per line to `<name>.args`
    pub fn tool(&self, name: &str, code: i32) -> String {
        let log = self.args_log(name);
        self.script(
            name,
            &format!(
                "for arg in \"$@\"; do\n  if [ \"$arg\" = --version ]; then echo 'ClamAV 1.4.1'; exit 0; fi\ndone\nprintf '%s\\n' \"$@\" > '{}'\nexit {code}",
                log.display()
            ),
        )
    }

    pub fn args_log(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}.args"))
    }

    /// Arguments the tool was last called with, if it ran
    pub fn logged_args(&self, name: &str) -> Option<Vec<String>> {
        std::fs::read_to_string(self.args_log(name))
            .ok()
            .map(|s| s.lines().map(str::to_string).collect())
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
