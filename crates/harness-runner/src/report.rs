use std::io::{self, Write};

use serde_json::{json, Value};

use crate::command::CommandLine;
use crate::runner::{IterationResult, RunObserver, RunOutcome, RunReport};

/// Console output for a launcher run. Results go to `out`, failures of
/// individual iterations go to `err`. In JSON mode `out` carries exactly one
/// JSON object and progress lines move to `err`.
///
/// Write errors during the repeat loop cannot stop the children already
/// running, so the first one is held and returned by `summary`.
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    json: bool,
    deferred: Option<io::Error>,
}

impl Reporter<io::Stdout, io::Stderr> {
    pub fn stdio(json: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), json)
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E, json: bool) -> Self {
        Self {
            out,
            err,
            json,
            deferred: None,
        }
    }

    fn progress(&mut self) -> &mut dyn Write {
        if self.json {
            &mut self.err
        } else {
            &mut self.out
        }
    }

    fn defer(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            if self.deferred.is_none() {
                tracing::warn!(error = %e, "report output failed");
                self.deferred = Some(e);
            }
        }
    }

    pub fn command(&mut self, command: &CommandLine) -> io::Result<()> {
        let progress = self.progress();
        writeln!(progress, "command: {:?}", command.as_slice())?;
        progress.flush()
    }

    pub fn summary(&mut self, report: &RunReport) -> io::Result<()> {
        if let Some(e) = self.deferred.take() {
            return Err(e);
        }
        if self.json {
            writeln!(self.out, "{}", report_to_json(report))?;
        } else {
            writeln!(self.out, "return codes:")?;
            writeln!(self.out, "{:?}", report.exit_codes())?;
            if report.interrupted {
                writeln!(
                    self.out,
                    "interrupted after {} of {} iterations",
                    report.iterations.len(),
                    report.repeat
                )?;
            }
        }
        self.out.flush()
    }

    pub fn build_result(&mut self, outcome: &RunOutcome) -> io::Result<()> {
        writeln!(self.out, "return state:")?;
        match outcome {
            RunOutcome::Exited { code } => writeln!(self.out, "exited with code {}", code)?,
            RunOutcome::Signaled { signal } => writeln!(self.out, "killed by signal {}", signal)?,
            RunOutcome::LaunchFailed { message } => writeln!(self.out, "not started: {}", message)?,
        }
        self.out.flush()
    }

    pub fn scripts(&mut self, names: &[String]) -> io::Result<()> {
        if self.json {
            writeln!(self.out, "{}", json!({ "ok": true, "scripts": names }))?;
        } else {
            for name in names {
                writeln!(self.out, "{}", name)?;
            }
        }
        self.out.flush()
    }

    pub fn usage(&mut self, usage: &str) -> io::Result<()> {
        if self.json {
            writeln!(self.out, "{}", json!({ "ok": true, "usage": usage }))?;
        } else {
            writeln!(self.out, "{}", usage)?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> RunObserver for Reporter<O, E> {
    fn iteration_started(&mut self, index: u32) {
        let progress = self.progress();
        let result = writeln!(progress, "iteration #{}", index).and_then(|_| progress.flush());
        self.defer(result);
    }

    fn iteration_finished(&mut self, result: &IterationResult) {
        if let RunOutcome::LaunchFailed { message } = &result.outcome {
            let written = writeln!(self.err, "error: iteration #{}: {}", result.index, message);
            self.defer(written);
        }
    }
}

pub fn report_to_json(report: &RunReport) -> Value {
    json!({
        "ok": true,
        "command": report.command,
        "repeat": report.repeat,
        "exit_codes": report.exit_codes(),
        "interrupted": report.interrupted,
        "iterations": report.iterations,
    })
}

pub fn error_to_json(code: &str, message: String) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": code,
            "message": message,
        }
    })
}
