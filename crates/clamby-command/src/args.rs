//! Argument vector construction.
//!
//! Every invocation is normalized the same way: operation arguments and the
//! shared default flags are merged as a set, sorted lexicographically, and
//! only then is the executable path put in front. Nothing is ever joined into
//! a shell string.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path};

use clamby_core::{Config, ExecMode, Executable, OutputLevel};

use crate::registry;

/// What the caller wants the ClamAV tools to do
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Scan a single file
    Scan(&'a Path),
    /// Refresh the signature databases
    Update,
    /// Ask the scanner for its version
    Version,
}

/// A fully resolved process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    executable: Executable,
    program: String,
    args: Vec<OsString>,
    mode: ExecMode,
    discard_stdout: bool,
}

impl Invocation {
    /// Resolve `executable`, add the default flags and sort the arguments.
    pub fn new<I, S>(executable: Executable, args: I, mode: ExecMode, config: &Config) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        args.extend(default_args(config));
        args.sort();
        args.dedup();

        Self {
            executable,
            program: registry::path_for(executable, config).to_string(),
            args,
            mode,
            discard_stdout: config.output_level == OutputLevel::Off,
        }
    }

    /// Which permitted tool this runs
    #[must_use]
    pub const fn executable(&self) -> Executable {
        self.executable
    }

    /// Configured path of the executable
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Sorted arguments, without the program
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    #[must_use]
    pub const fn mode(&self) -> ExecMode {
        self.mode
    }

    /// Whether standard output goes to the null device
    #[must_use]
    pub const fn discard_stdout(&self) -> bool {
        self.discard_stdout
    }

    /// Program followed by the arguments
    #[must_use]
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(OsStr::new(&self.program))
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }
}

/// Build the invocation for an operation under the given configuration.
#[must_use]
pub fn build(operation: Operation<'_>, config: &Config) -> Invocation {
    match operation {
        Operation::Scan(path) => {
            let mut args = vec![scan_target(path), OsString::from("--no-summary")];

            if config.daemonize {
                if config.fdpass {
                    args.push(OsString::from("--fdpass"));
                }
                if config.stream {
                    args.push(OsString::from("--stream"));
                }
            }

            if let Some(datadir) = &config.datadir {
                args.push(flag_with_value("--database=", datadir.as_os_str()));
            }

            Invocation::new(
                Executable::scanner(config.daemonize),
                args,
                ExecMode::Standard,
                config,
            )
        }
        Operation::Update => {
            let args = config
                .datadir
                .as_ref()
                .map(|datadir| flag_with_value("--datadir=", datadir.as_os_str()));

            Invocation::new(Executable::Freshclam, args, ExecMode::Standard, config)
        }
        Operation::Version => Invocation::new(
            Executable::scanner(config.daemonize),
            ["--version"],
            ExecMode::Probe,
            config,
        ),
    }
}

/// The scan target as an argument.
///
/// Arguments are sorted, so a `--` separator cannot protect the path. A
/// relative path starting with a plain name gets a `./` prefix instead, which
/// keeps a file called `--version` from reading as a flag or being merged
/// with one.
fn scan_target(path: &Path) -> OsString {
    match path.components().next() {
        Some(Component::Normal(_)) => Path::new(".").join(path).into_os_string(),
        _ => path.as_os_str().to_os_string(),
    }
}

/// Flags shared by every operation.
fn default_args(config: &Config) -> Vec<OsString> {
    let mut args = Vec::new();

    if config.daemonize {
        if let Some(config_file) = &config.config_file {
            args.push(flag_with_value("--config-file=", config_file.as_os_str()));
        }
    }

    match config.output_level {
        OutputLevel::Low => args.push(OsString::from("--quiet")),
        OutputLevel::High => args.push(OsString::from("--verbose")),
        OutputLevel::Off | OutputLevel::Medium => {}
    }

    args
}

fn flag_with_value(flag: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(value);
    arg
}

#[cfg(test)]
mod tests {
    use super::*;
    use clamby_core::ConfigOptions;

    const FILE: &str = "/tmp/good_file.txt";

    fn config(options: ConfigOptions) -> Config {
        Config::default().merged(options)
    }

    fn scan(options: ConfigOptions) -> Invocation {
        build(Operation::Scan(Path::new(FILE)), &config(options))
    }

    fn strings(invocation: &Invocation) -> Vec<String> {
        invocation
            .argv()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    fn has(invocation: &Invocation, arg: &str) -> bool {
        invocation.args().iter().any(|a| a == arg)
    }

    #[test]
    fn default_scan() {
        let invocation = scan(ConfigOptions::new());
        assert_eq!(strings(&invocation), ["clamscan", "--no-summary", FILE]);
        assert_eq!(invocation.mode(), ExecMode::Standard);
        assert_eq!(invocation.executable(), Executable::Clamscan);
        assert!(!invocation.discard_stdout());
    }

    #[test]
    fn fdpass_and_stream_only_in_daemon_mode() {
        let standalone = scan(ConfigOptions::new().fdpass(true).stream(true));
        assert_eq!(strings(&standalone), ["clamscan", "--no-summary", FILE]);

        let daemon = scan(ConfigOptions::new().daemonize(true).fdpass(true));
        assert_eq!(
            strings(&daemon),
            ["clamdscan", "--fdpass", "--no-summary", FILE]
        );

        let daemon = scan(ConfigOptions::new().daemonize(true).stream(true));
        assert_eq!(
            strings(&daemon),
            ["clamdscan", "--no-summary", "--stream", FILE]
        );
    }

    #[test]
    fn datadir_for_scan_in_both_modes() {
        for daemonize in [false, true] {
            let invocation = scan(
                ConfigOptions::new()
                    .daemonize(daemonize)
                    .datadir(Some("/var/lib/clamav")),
            );
            assert!(has(&invocation, "--database=/var/lib/clamav"), "daemonize={daemonize}");
        }
    }

    #[test]
    fn datadir_for_update_in_both_modes() {
        for daemonize in [false, true] {
            let invocation = build(
                Operation::Update,
                &config(
                    ConfigOptions::new()
                        .daemonize(daemonize)
                        .datadir(Some("/var/lib/clamav")),
                ),
            );
            assert_eq!(
                strings(&invocation),
                ["freshclam", "--datadir=/var/lib/clamav"]
            );
        }
    }

    #[test]
    fn update_without_options_has_no_args() {
        let invocation = build(Operation::Update, &Config::default());
        assert_eq!(strings(&invocation), ["freshclam"]);
    }

    #[test]
    fn version_probe_is_a_single_flag() {
        let invocation = build(
            Operation::Version,
            &config(ConfigOptions::new().fdpass(true).datadir(Some("/db"))),
        );
        assert_eq!(strings(&invocation), ["clamscan", "--version"]);
        assert_eq!(invocation.mode(), ExecMode::Probe);

        let invocation = build(Operation::Version, &config(ConfigOptions::new().daemonize(true)));
        assert_eq!(strings(&invocation), ["clamdscan", "--version"]);
    }

    #[test]
    fn config_file_only_with_daemonize() {
        let standalone = scan(ConfigOptions::new().config_file(Some("clamd.conf")));
        assert!(!has(&standalone, "--config-file=clamd.conf"));

        let daemon = scan(ConfigOptions::new().daemonize(true));
        assert!(!daemon
            .args()
            .iter()
            .any(|a| a.to_string_lossy().starts_with("--config-file")));

        let daemon = scan(
            ConfigOptions::new()
                .daemonize(true)
                .config_file(Some("clamd.conf")),
        );
        assert!(has(&daemon, "--config-file=clamd.conf"));

        let update = build(
            Operation::Update,
            &config(
                ConfigOptions::new()
                    .daemonize(true)
                    .config_file(Some("clamd.conf")),
            ),
        );
        assert!(has(&update, "--config-file=clamd.conf"));
    }

    #[test]
    fn output_level_flags() {
        let low = scan(ConfigOptions::new().output_level(OutputLevel::Low));
        assert!(has(&low, "--quiet"));
        assert!(!has(&low, "--verbose"));

        let high = scan(ConfigOptions::new().output_level(OutputLevel::High));
        assert!(has(&high, "--verbose"));
        assert!(!has(&high, "--quiet"));

        let off = scan(ConfigOptions::new().output_level(OutputLevel::Off));
        assert!(!has(&off, "--quiet"));
        assert!(!has(&off, "--verbose"));
        assert!(off.discard_stdout());

        let version = build(
            Operation::Version,
            &config(ConfigOptions::new().output_level(OutputLevel::High)),
        );
        assert_eq!(strings(&version), ["clamscan", "--verbose", "--version"]);
    }

    #[test]
    fn args_are_sorted_for_every_combination() {
        let levels = [
            OutputLevel::Off,
            OutputLevel::Low,
            OutputLevel::Medium,
            OutputLevel::High,
        ];
        for bits in 0..32u8 {
            for level in levels {
                let options = ConfigOptions::new()
                    .daemonize(bits & 1 != 0)
                    .fdpass(bits & 2 != 0)
                    .stream(bits & 4 != 0)
                    .datadir((bits & 8 != 0).then_some("/db"))
                    .config_file((bits & 16 != 0).then_some("/etc/clamd.conf"))
                    .output_level(level);
                let config = config(options);

                for operation in [
                    Operation::Scan(Path::new(FILE)),
                    Operation::Update,
                    Operation::Version,
                ] {
                    let invocation = build(operation, &config);
                    let args = invocation.args();
                    assert!(
                        args.windows(2).all(|w| w[0] < w[1]),
                        "unsorted or duplicated args {args:?} for {operation:?}"
                    );
                    assert_eq!(invocation.argv()[0], OsStr::new(invocation.program()));
                }
            }
        }
    }

    #[test]
    fn custom_program_stays_first() {
        let invocation = scan(
            ConfigOptions::new().executable_path(Executable::Clamscan, "/custom/path/clamscan"),
        );
        assert_eq!(
            strings(&invocation),
            ["/custom/path/clamscan", "--no-summary", FILE]
        );
    }

    #[test]
    fn special_characters_stay_one_argument() {
        let path = Path::new("/tmp/it's a \"file\" $(rm -rf).txt");
        let invocation = build(Operation::Scan(path), &Config::default());
        assert!(invocation.args().iter().any(|a| a == path.as_os_str()));
        assert_eq!(invocation.args().len(), 2);
    }

    #[test]
    fn relative_paths_cannot_pose_as_flags() {
        let invocation = build(Operation::Scan(Path::new("--version")), &Config::default());
        assert_eq!(strings(&invocation), ["clamscan", "--no-summary", "./--version"]);

        let invocation = build(Operation::Scan(Path::new("--no-summary")), &Config::default());
        assert_eq!(
            strings(&invocation),
            ["clamscan", "--no-summary", "./--no-summary"]
        );

        let invocation = build(
            Operation::Scan(Path::new("uploads/report.pdf")),
            &Config::default(),
        );
        assert!(has(&invocation, "./uploads/report.pdf"));
    }

    #[test]
    fn anchored_paths_are_passed_unchanged() {
        for path in ["/tmp/--version", "./--stream", "../--quiet"] {
            let invocation = build(Operation::Scan(Path::new(path)), &Config::default());
            assert!(has(&invocation, path), "{path}");
            assert_eq!(invocation.args().len(), 2);
        }
    }

    #[test]
    fn duplicate_flags_collapse() {
        let invocation = Invocation::new(
            Executable::Clamscan,
            ["--quiet", "--quiet"],
            ExecMode::Standard,
            &config(ConfigOptions::new().output_level(OutputLevel::Low)),
        );
        assert_eq!(strings(&invocation), ["clamscan", "--quiet"]);
    }
}
