use std::process::{Command, ExitStatus};
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use crate::command::CommandLine;
use crate::error::LaunchError;

/// Exit code recorded for an iteration whose process could not be started.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = -1;

const SIGINT: i32 = 2;
const SIGTERM: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    Exited { code: i32 },
    Signaled { signal: i32 },
    LaunchFailed { message: String },
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Exited { code } => *code,
            RunOutcome::Signaled { signal } => 128 + signal,
            RunOutcome::LaunchFailed { .. } => LAUNCH_FAILURE_EXIT_CODE,
        }
    }

    fn is_interrupt(&self) -> bool {
        matches!(self, RunOutcome::Signaled { signal } if *signal == SIGINT || *signal == SIGTERM)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IterationResult {
    pub index: u32,
    pub exit_code: i32,
    pub outcome: RunOutcome,
    pub started_at: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub command: CommandLine,
    pub repeat: u32,
    pub iterations: Vec<IterationResult>,
    pub interrupted: bool,
}

impl RunReport {
    pub fn exit_codes(&self) -> Vec<i32> {
        self.iterations.iter().map(|it| it.exit_code).collect()
    }
}

/// Receives progress as the repeat loop advances.
pub trait RunObserver {
    fn iteration_started(&mut self, index: u32);

    fn iteration_finished(&mut self, _result: &IterationResult) {}
}

/// Runs `command` up to `repeat` times, one after the other, with the
/// launcher's stdio inherited.
///
/// A launch failure is recorded and the loop moves on. A child stopped by
/// SIGINT or SIGTERM ends the loop early and marks the report interrupted.
pub fn run_repeated<R: RunObserver + ?Sized>(
    command: &CommandLine,
    repeat: u32,
    observer: &mut R,
) -> RunReport {
    let mut iterations = Vec::new();
    let mut interrupted = false;
    for index in 0..repeat {
        observer.iteration_started(index);
        tracing::info!(iteration = index, program = command.program(), "launching");

        let started_at = Utc::now().to_rfc3339();
        let clock = Instant::now();
        let outcome = run_once(command);
        let result = IterationResult {
            index,
            exit_code: outcome.exit_code(),
            outcome,
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
        };
        tracing::info!(iteration = index, exit_code = result.exit_code, "iteration finished");
        observer.iteration_finished(&result);

        let stop = result.outcome.is_interrupt();
        iterations.push(result);
        if stop {
            tracing::warn!(iteration = index, "child interrupted, abandoning remaining iterations");
            interrupted = true;
            break;
        }
    }
    RunReport {
        command: command.clone(),
        repeat,
        iterations,
        interrupted,
    }
}

/// Runs `command` a single time.
pub fn run_once(command: &CommandLine) -> RunOutcome {
    match Command::new(command.program()).args(command.args()).status() {
        Ok(status) => outcome_from_status(status),
        Err(source) => {
            let err = LaunchError::LaunchFailure {
                program: command.program().to_string(),
                source,
            };
            tracing::warn!(error = %err, "launch failed");
            RunOutcome::LaunchFailed {
                message: err.to_string(),
            }
        }
    }
}

fn outcome_from_status(status: ExitStatus) -> RunOutcome {
    if let Some(code) = status.code() {
        return RunOutcome::Exited { code };
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return RunOutcome::Signaled { signal };
        }
    }
    RunOutcome::LaunchFailed {
        message: format!("child ended without an exit code: {}", status),
    }
}
