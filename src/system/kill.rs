use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::command::{self, CommandError, CommandOutput};
use super::platform::{self, KillReport};
use super::process::{Pid, ProcessRecord};

#[derive(Debug, thiserror::Error)]
pub enum TerminationError {
    #[error("refusing to terminate {0}")]
    InvalidTarget(String),
    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` did not finish within {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },
    #[error("failed to kill {label} (PID {pid}): {diagnostic}", label = .name.as_deref().unwrap_or("process"))]
    Pid {
        pid: Pid,
        name: Option<String>,
        diagnostic: String,
    },
    #[error("no running process named {name}: {diagnostic}")]
    NoMatch { name: String, diagnostic: String },
    #[error("failed to kill {failed} process(es) named {name}: {diagnostic}")]
    Rejected {
        name: String,
        failed: usize,
        diagnostic: String,
    },
}

impl From<CommandError> for TerminationError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Spawn { command, source } => TerminationError::Spawn { command, source },
            CommandError::Timeout { command, timeout } => {
                TerminationError::Timeout { command, timeout }
            }
        }
    }
}

/// Result of a bulk kill by name.
///
/// The counts come from the termination command's own per-process output,
/// or from a match taken just before the kill where the command prints
/// nothing. Either way they are approximate; a fresh snapshot is the source
/// of truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KillAllOutcome {
    pub attempted: usize,
    pub terminated: usize,
    pub partial: bool,
}

/// Forceful termination through the platform's kill commands. No retries.
#[derive(Clone, Debug)]
pub struct TerminationExecutor {
    timeout: Duration,
}

impl Default for TerminationExecutor {
    fn default() -> Self {
        Self::new(command::DEFAULT_TIMEOUT)
    }
}

impl TerminationExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn kill_by_pid(&self, pid: Pid) -> Result<(), TerminationError> {
        self.kill_pid_named(pid, None).await
    }

    /// Same as [`kill_by_pid`](Self::kill_by_pid); errors carry the record's name.
    pub async fn kill_process(&self, record: &ProcessRecord) -> Result<(), TerminationError> {
        self.kill_pid_named(record.pid, Some(&record.name)).await
    }

    #[tracing::instrument(level = "info", name = "kill.pid", skip(self))]
    async fn kill_pid_named(&self, pid: Pid, name: Option<&str>) -> Result<(), TerminationError> {
        if pid == 0 {
            return Err(TerminationError::InvalidTarget("PID 0".to_string()));
        }

        let spec = platform::kill_pid_command(pid);
        let output = command::run(&spec, self.timeout).await?;
        if output.success {
            info!("process terminated");
            Ok(())
        } else {
            let diagnostic = output.diagnostic();
            warn!(%diagnostic, "termination failed");
            Err(TerminationError::Pid {
                pid,
                name: name.map(str::to_string),
                diagnostic,
            })
        }
    }

    #[tracing::instrument(level = "info", name = "kill.all_by_name", skip(self))]
    pub async fn kill_all_by_name(&self, name: &str) -> Result<KillAllOutcome, TerminationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TerminationError::InvalidTarget(
                "an empty process name".to_string(),
            ));
        }

        let matched = match platform::match_name_command(name) {
            Some(spec) => {
                let output = command::run(&spec, self.timeout).await?;
                let count = platform::parse_match_count(&output.stdout);
                debug!(count, "instances matched before kill");
                Some(count)
            }
            None => None,
        };

        let spec = platform::kill_name_command(name);
        let output = command::run(&spec, self.timeout).await?;
        let report = platform::parse_kill_report(&output.stdout, &output.stderr, matched);
        let result = evaluate_kill_all(name, &output, report);
        match &result {
            Ok(outcome) => info!(
                attempted = outcome.attempted,
                terminated = outcome.terminated,
                partial = outcome.partial,
                "bulk termination finished"
            ),
            Err(err) => warn!(error = %err, "bulk termination failed"),
        }
        result
    }
}

/// Turns the raw result of a bulk kill into an outcome.
///
/// Anything terminated makes the call a success, possibly partial.
pub fn evaluate_kill_all(
    name: &str,
    output: &CommandOutput,
    report: KillReport,
) -> Result<KillAllOutcome, TerminationError> {
    let attempted = report.terminated + report.failed;
    if output.success || report.terminated > 0 {
        return Ok(KillAllOutcome {
            attempted,
            terminated: report.terminated,
            partial: !output.success || report.failed > 0,
        });
    }

    if report.failed == 0 {
        Err(TerminationError::NoMatch {
            name: name.to_string(),
            diagnostic: output.diagnostic(),
        })
    } else {
        Err(TerminationError::Rejected {
            name: name.to_string(),
            failed: report.failed,
            diagnostic: output.diagnostic(),
        })
    }
}
