//! Launch driver for the MMTk test harness.
//!
//! Resolves `plan`, `script_name` and `key=value` overrides into a
//! `java -ea -jar dist/mmtk-harness.jar ...` command, runs it one or more
//! times and reports the exit codes. Also builds and runs the `buildit`
//! test-suite command.

use std::io::Write;

pub mod args;
pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod options;
pub mod report;
pub mod runner;

pub use args::{classify, Classified, HARNESS_USAGE};
pub use command::{build_buildit_command, build_harness_command, CommandLine, HarnessInvocation};
pub use config::LauncherConfig;
pub use error::{LaunchError, Result};
pub use options::OptionStore;
pub use report::Reporter;
pub use runner::{run_once, run_repeated, RunObserver, RunOutcome, RunReport};

/// Runs the harness launcher over raw command-line tokens.
///
/// Returns `Ok(None)` when a listing or usage request short-circuited the
/// run. Argument errors are returned before anything is launched.
pub fn launch_harness<O: Write, E: Write>(
    config: &LauncherConfig,
    tokens: &[String],
    reporter: &mut Reporter<O, E>,
) -> Result<Option<RunReport>> {
    let (options, positionals) = match classify(tokens, OptionStore::with_defaults())? {
        Classified::ListScripts => {
            let names = catalog::list_scripts(&config.scripts_dir, &config.script_extension)?;
            reporter.scripts(&names)?;
            return Ok(None);
        }
        Classified::Help => {
            reporter.usage(HARNESS_USAGE)?;
            return Ok(None);
        }
        Classified::Invocation {
            options,
            positionals,
        } => (options, positionals),
    };

    let invocation = build_harness_command(config, options, &positionals)?;
    reporter.command(&invocation.command)?;
    let report = run_repeated(&invocation.command, invocation.repeat, reporter);
    reporter.summary(&report)?;
    Ok(Some(report))
}

/// Runs `buildit` once for the given plan and test suite.
pub fn launch_build_test<O: Write, E: Write>(
    config: &LauncherConfig,
    positionals: &[String],
    reporter: &mut Reporter<O, E>,
) -> Result<RunOutcome> {
    let command = build_buildit_command(config, positionals);
    reporter.command(&command)?;
    let outcome = run_once(&command);
    if let RunOutcome::LaunchFailed { message } = &outcome {
        tracing::error!(%message, "buildit did not start");
    }
    reporter.build_result(&outcome)?;
    Ok(outcome)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use std::path::PathBuf;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn quiet() -> Reporter<Vec<u8>, Vec<u8>> {
        Reporter::new(Vec::new(), Vec::new(), false)
    }

    fn shell_config() -> LauncherConfig {
        // `true` ignores the jar arguments and exits 0.
        LauncherConfig {
            java: "true".to_string(),
            ..LauncherConfig::default()
        }
    }

    #[test]
    fn repeat_option_drives_iteration_count() {
        let mut reporter = quiet();
        let report = launch_harness(
            &shell_config(),
            &tokens(&["GenMS", "alloc", "repeat=3"]),
            &mut reporter,
        )
        .expect("launch")
        .expect("report");
        assert_eq!(report.exit_codes(), vec![0, 0, 0]);
        assert!(report
            .command
            .as_slice()
            .iter()
            .all(|a| !a.starts_with("repeat=")));
    }

    #[test]
    fn missing_script_name_fails_before_launch() {
        let mut reporter = quiet();
        let err = launch_harness(&shell_config(), &tokens(&["GenMS"]), &mut reporter)
            .expect_err("should fail");
        assert!(matches!(err, LaunchError::MissingArgument { .. }));
        let (out, _) = reporter.into_inner();
        assert!(out.is_empty(), "nothing should be printed or launched");
    }

    #[test]
    fn list_flag_prints_catalog_without_launching() {
        let dir = std::env::temp_dir().join(format!(
            "mmtk_launch_ls_{}_{}",
            std::process::id(),
            Utc::now().timestamp_micros()
        ));
        fs::create_dir_all(&dir).expect("scratch dir");
        fs::write(dir.join("b.script"), "").expect("write");
        fs::write(dir.join("a.script"), "").expect("write");
        let config = LauncherConfig {
            java: "/nonexistent/java".to_string(),
            scripts_dir: PathBuf::from(&dir),
            ..LauncherConfig::default()
        };
        let mut reporter = quiet();
        let got = launch_harness(&config, &tokens(&["GenMS", "--ls", "x=y=z"]), &mut reporter)
            .expect("launch");
        assert!(got.is_none());
        let (out, err) = reporter.into_inner();
        assert_eq!(String::from_utf8(out).expect("utf8"), "a.script\nb.script\n");
        assert!(err.is_empty());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn help_prints_usage() {
        let mut reporter = quiet();
        let got = launch_harness(&shell_config(), &tokens(&["--help"]), &mut reporter)
            .expect("launch");
        assert!(got.is_none());
        let (out, _) = reporter.into_inner();
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            format!("{}\n", HARNESS_USAGE)
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unwritable_report_is_an_error() {
        let mut reporter = Reporter::new(ClosedPipe, Vec::new(), false);
        let err = launch_harness(
            &shell_config(),
            &tokens(&["GenMS", "alloc", "repeat=2"]),
            &mut reporter,
        )
        .expect_err("should fail");
        assert!(matches!(err, LaunchError::Output(_)));
        assert!(!err.is_usage());

        let mut reporter = Reporter::new(ClosedPipe, Vec::new(), false);
        let err = launch_build_test(&shell_config(), &[], &mut reporter).expect_err("should fail");
        assert!(matches!(err, LaunchError::Output(_)));
    }

    #[test]
    fn build_test_reports_child_exit() {
        let config = LauncherConfig {
            buildit: "false".to_string(),
            ..LauncherConfig::default()
        };
        let mut reporter = quiet();
        let outcome = launch_build_test(&config, &[], &mut reporter).expect("launch");
        assert_eq!(outcome, RunOutcome::Exited { code: 1 });
        let (out, _) = reporter.into_inner();
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("\"localhost\", \"-t\", \"basic\", \"production\""), "{}", out);
        assert!(out.ends_with("return state:\nexited with code 1\n"), "{}", out);
    }
}
