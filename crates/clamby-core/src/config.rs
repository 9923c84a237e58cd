//! Scanner configuration and partial option updates.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing::warn;

use crate::error::{ClambyError, Result};
use crate::types::Executable;

/// How much output the ClamAV tools should produce.
///
/// Names are matched case-insensitively, both by [`FromStr`] and when
/// deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLevel {
    /// Standard output of the tool is discarded
    Off,
    /// Tools run with `--quiet`
    Low,
    /// Tools run with their default verbosity
    #[default]
    Medium,
    /// Tools run with `--verbose`
    High,
}

impl OutputLevel {
    /// Lowercase name as used in config files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for OutputLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputLevel {
    type Err = ClambyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ClambyError::Config(format!(
                "unknown output level `{other}` (expected off, low, medium or high)"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for OutputLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Full scanner configuration.
///
/// Created with defaults and changed only through [`Config::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Probe the scanner with `--version` before every scan.
    pub check: bool,

    /// Scan through `clamdscan` instead of `clamscan`.
    pub daemonize: bool,

    /// clamd config file, only passed to `clamdscan`.
    pub config_file: Option<PathBuf>,

    /// Raise when the daemon client exits with a non-detection error.
    pub error_clamscan_client_error: bool,

    /// Raise when the scan target is missing (otherwise the scan is skipped).
    pub error_file_missing: bool,

    /// Raise when a virus is detected (otherwise report it as a value).
    pub error_file_virus: bool,

    /// Pass the file descriptor to clamd (daemon mode only).
    pub fdpass: bool,

    /// Stream the file to clamd (daemon mode only).
    pub stream: bool,

    /// Verbosity of the spawned tools.
    pub output_level: OutputLevel,

    /// Signature database directory override.
    pub datadir: Option<PathBuf>,

    /// Path of the `clamscan` executable.
    pub executable_path_clamscan: String,

    /// Path of the `clamdscan` executable.
    pub executable_path_clamdscan: String,

    /// Path of the `freshclam` executable.
    pub executable_path_freshclam: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check: true,
            daemonize: false,
            config_file: None,
            error_clamscan_client_error: false,
            error_file_missing: true,
            error_file_virus: false,
            fdpass: false,
            stream: false,
            output_level: OutputLevel::Medium,
            datadir: None,
            executable_path_clamscan: Executable::Clamscan.name().to_string(),
            executable_path_clamdscan: Executable::Clamdscan.name().to_string(),
            executable_path_freshclam: Executable::Freshclam.name().to_string(),
        }
    }
}

impl Config {
    /// Load options from a TOML file over the defaults.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse TOML options over the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: ConfigOptions = toml::from_str(content)?;
        let mut config = Self::default();
        config.merge(options);
        Ok(config)
    }

    /// Configured path for a permitted executable
    #[must_use]
    pub fn executable_path(&self, executable: Executable) -> &str {
        match executable {
            Executable::Clamscan => &self.executable_path_clamscan,
            Executable::Clamdscan => &self.executable_path_clamdscan,
            Executable::Freshclam => &self.executable_path_freshclam,
        }
    }

    /// Apply every option present in `options`; absent options keep their value.
    ///
    /// Setting `silence_output` logs a deprecation warning the first time it
    /// is seen from each call site.
    #[track_caller]
    pub fn merge(&mut self, options: ConfigOptions) {
        let ConfigOptions {
            check,
            daemonize,
            config_file,
            error_clamscan_client_error,
            error_file_missing,
            error_file_virus,
            fdpass,
            stream,
            mut output_level,
            datadir,
            executable_path_clamscan,
            executable_path_clamdscan,
            executable_path_freshclam,
            silence_output,
        } = options;

        if silence_output == Some(true) {
            let site = Location::caller();
            if first_alias_use(site) {
                warn!(
                    caller = %site,
                    "`silence_output` is deprecated, use `output_level = \"off\"` instead"
                );
            }
            output_level = Some(OutputLevel::Off);
        }

        assign(&mut self.check, check);
        assign(&mut self.daemonize, daemonize);
        assign(&mut self.config_file, config_file);
        assign(
            &mut self.error_clamscan_client_error,
            error_clamscan_client_error,
        );
        assign(&mut self.error_file_missing, error_file_missing);
        assign(&mut self.error_file_virus, error_file_virus);
        assign(&mut self.fdpass, fdpass);
        assign(&mut self.stream, stream);
        assign(&mut self.output_level, output_level);
        assign(&mut self.datadir, datadir);
        assign(&mut self.executable_path_clamscan, executable_path_clamscan);
        assign(&mut self.executable_path_clamdscan, executable_path_clamdscan);
        assign(&mut self.executable_path_freshclam, executable_path_freshclam);
    }

    /// Builder-style [`Config::merge`]
    #[must_use]
    #[track_caller]
    pub fn merged(mut self, options: ConfigOptions) -> Self {
        self.merge(options);
        self
    }
}

static ALIAS_CALL_SITES: Mutex<BTreeSet<&'static Location<'static>>> =
    Mutex::new(BTreeSet::new());

fn first_alias_use(site: &'static Location<'static>) -> bool {
    ALIAS_CALL_SITES
        .lock()
        .map_or(true, |mut sites| sites.insert(site))
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// A partial configuration update.
///
/// Unknown keys are ignored when deserializing. Nullable options use a
/// nested `Option` so an explicit `null` resets them while an absent key
/// leaves them alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigOptions {
    pub check: Option<bool>,
    pub daemonize: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub config_file: Option<Option<PathBuf>>,
    pub error_clamscan_client_error: Option<bool>,
    pub error_file_missing: Option<bool>,
    pub error_file_virus: Option<bool>,
    pub fdpass: Option<bool>,
    pub stream: Option<bool>,
    pub output_level: Option<OutputLevel>,
    #[serde(default, deserialize_with = "nullable")]
    pub datadir: Option<Option<PathBuf>>,
    pub executable_path_clamscan: Option<String>,
    pub executable_path_clamdscan: Option<String>,
    pub executable_path_freshclam: Option<String>,
    /// Deprecated alias for `output_level = "off"`.
    pub silence_output: Option<bool>,
}

impl ConfigOptions {
    /// Empty update
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a loosely typed option map, e.g. `{"daemonize": true}`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    #[must_use]
    pub fn check(mut self, check: bool) -> Self {
        self.check = Some(check);
        self
    }

    #[must_use]
    pub fn daemonize(mut self, daemonize: bool) -> Self {
        self.daemonize = Some(daemonize);
        self
    }

    #[must_use]
    pub fn config_file(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.config_file = Some(path.map(Into::into));
        self
    }

    #[must_use]
    pub fn error_clamscan_client_error(mut self, raise: bool) -> Self {
        self.error_clamscan_client_error = Some(raise);
        self
    }

    #[must_use]
    pub fn error_file_missing(mut self, raise: bool) -> Self {
        self.error_file_missing = Some(raise);
        self
    }

    #[must_use]
    pub fn error_file_virus(mut self, raise: bool) -> Self {
        self.error_file_virus = Some(raise);
        self
    }

    #[must_use]
    pub fn fdpass(mut self, fdpass: bool) -> Self {
        self.fdpass = Some(fdpass);
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    #[must_use]
    pub fn output_level(mut self, level: OutputLevel) -> Self {
        self.output_level = Some(level);
        self
    }

    #[must_use]
    pub fn datadir(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.datadir = Some(path.map(Into::into));
        self
    }

    /// Set the configured path for one executable
    #[must_use]
    pub fn executable_path(mut self, executable: Executable, path: impl Into<String>) -> Self {
        let path = Some(path.into());
        match executable {
            Executable::Clamscan => self.executable_path_clamscan = path,
            Executable::Clamdscan => self.executable_path_clamdscan = path,
            Executable::Freshclam => self.executable_path_freshclam = path,
        }
        self
    }

    #[must_use]
    pub fn silence_output(mut self, silence: bool) -> Self {
        self.silence_output = Some(silence);
        self
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
