use serde::Serialize;

use crate::config::LauncherConfig;
use crate::error::{LaunchError, Result};
use crate::options::{OptionStore, REPEAT_KEY};

pub const DEFAULT_BUILD_PLAN: &str = "production";
pub const DEFAULT_TESTSUITE: &str = "basic";

/// Program plus arguments for one child invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandLine {
    parts: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            parts: vec![program.into()],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.parts.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.parts[0]
    }

    pub fn args(&self) -> &[String] {
        &self.parts[1..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.parts
    }

    /// POSIX-shell rendering, for display only.
    pub fn shell_join(&self) -> String {
        self.parts
            .iter()
            .map(|p| shell_quote(p))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything needed to launch the harness, fixed before the first run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessInvocation {
    pub command: CommandLine,
    pub repeat: u32,
}

/// Builds the harness command line from classified options and positionals.
///
/// The first positional is the plan, the second the script name. `repeat` is
/// taken out of the options and returned separately.
pub fn build_harness_command(
    config: &LauncherConfig,
    mut options: OptionStore,
    positionals: &[String],
) -> Result<HarnessInvocation> {
    let plan = positionals
        .first()
        .ok_or(LaunchError::MissingArgument { name: "plan" })?;
    let script_name = positionals
        .get(1)
        .ok_or(LaunchError::MissingArgument {
            name: "script_name",
        })?;
    if positionals.len() > 2 {
        tracing::warn!(ignored = ?&positionals[2..], "ignoring extra positional arguments");
    }

    let repeat = match options.remove(REPEAT_KEY) {
        Some(raw) => parse_repeat(&raw)?,
        None => 1,
    };

    let mut command = CommandLine::new(config.java.as_str())
        .arg("-ea")
        .arg("-jar")
        .arg(config.harness_jar.as_str())
        .arg(config.script_path(script_name))
        .arg(format!("plan={}", plan));
    for (key, value) in options.iter() {
        command = command.arg(format!("{}={}", key, value));
    }
    tracing::debug!(command = %command.shell_join(), repeat, "built harness command");
    Ok(HarnessInvocation { command, repeat })
}

/// Builds the `buildit` command line. Missing positionals fall back to the
/// production plan and the basic test suite.
pub fn build_buildit_command(config: &LauncherConfig, positionals: &[String]) -> CommandLine {
    let plan = positionals
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_BUILD_PLAN);
    let testsuite = positionals
        .get(1)
        .map(String::as_str)
        .unwrap_or(DEFAULT_TESTSUITE);
    let command = CommandLine::new(config.buildit.as_str())
        .arg(config.host.as_str())
        .arg("-t")
        .arg(testsuite)
        .arg(plan);
    tracing::debug!(command = %command.shell_join(), "built buildit command");
    command
}

fn parse_repeat(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(LaunchError::InvalidRepeat {
            value: raw.to_string(),
        }),
    }
}

fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:=".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    }
}
