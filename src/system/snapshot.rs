use std::time::Duration;

use tracing::{debug, warn};

use super::command::{self, CommandError};
use super::platform::{self, Delimiter, RowLayout};
use super::process::{CpuUsage, Pid, ProcessRecord};

pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// How much detail the platform listing command is asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnumerationDepth {
    /// Name and PID only.
    Basic,
    /// Name, PID and memory (plus a CPU estimate where the platform has one).
    #[default]
    Detailed,
}

impl EnumerationDepth {
    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "basic" => EnumerationDepth::Basic,
            _ => EnumerationDepth::Detailed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnumerationDepth::Basic => "basic",
            EnumerationDepth::Detailed => "detailed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` did not finish within {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },
    #[error("`{command}` failed: {diagnostic}")]
    CommandFailed { command: String, diagnostic: String },
    #[error("`{command}` listed no processes")]
    NoRecords { command: String },
}

impl From<CommandError> for EnumerationError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Spawn { command, source } => EnumerationError::Spawn { command, source },
            CommandError::Timeout { command, timeout } => {
                EnumerationError::Timeout { command, timeout }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotReader {
    depth: EnumerationDepth,
    timeout: Duration,
}

impl Default for SnapshotReader {
    fn default() -> Self {
        Self::new(EnumerationDepth::default(), command::DEFAULT_TIMEOUT)
    }
}

impl SnapshotReader {
    pub fn new(depth: EnumerationDepth, timeout: Duration) -> Self {
        Self { depth, timeout }
    }

    pub fn depth(&self) -> EnumerationDepth {
        self.depth
    }

    /// Takes a fresh snapshot of running processes, sorted by name.
    #[tracing::instrument(level = "debug", name = "snapshot.list_processes", skip(self), fields(depth = self.depth.label()))]
    pub async fn list_processes(&self) -> Result<Vec<ProcessRecord>, EnumerationError> {
        let listing = platform::listing_command(self.depth);
        let output = command::run(&listing.spec, self.timeout).await?;

        if !output.success {
            warn!(code = ?output.code, "process listing command failed");
            return Err(EnumerationError::CommandFailed {
                command: listing.spec.to_string(),
                diagnostic: output.diagnostic(),
            });
        }

        let records = parse_listing(&output.stdout, &listing.layout);
        if records.is_empty() {
            return Err(EnumerationError::NoRecords {
                command: listing.spec.to_string(),
            });
        }
        debug!(count = records.len(), "parsed process listing");
        Ok(records)
    }
}

/// Parses the full output of a listing command.
///
/// Rows that cannot be read are skipped, never fatal. The result is sorted
/// by name (case-sensitive, stable, so same-named rows keep output order).
pub fn parse_listing(text: &str, layout: &RowLayout) -> Vec<ProcessRecord> {
    let mut records: Vec<ProcessRecord> = text
        .lines()
        .filter_map(|line| parse_row(line, layout))
        .collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

/// Parses one data row. Header, banner, short and malformed rows give `None`.
pub fn parse_row(line: &str, layout: &RowLayout) -> Option<ProcessRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let fields = split_fields(line, layout);
    if fields.len() < layout.min_fields() {
        return None;
    }

    let name = fields[layout.name_column].trim();
    let pid_raw = fields[layout.pid_column].trim();
    if name.is_empty() || pid_raw.is_empty() {
        return None;
    }
    // Header rows ("ProcessId", "PID") fall out here too.
    let pid: Pid = pid_raw.parse().ok()?;

    let memory_mb = match layout.memory_column {
        Some(column) => {
            let raw = parse_memory(fields[column].trim(), layout.memory_unit_bytes)?;
            Some(bytes_to_mb(raw))
        }
        None => None,
    };

    let cpu = layout
        .cpu_column
        .and_then(|column| fields[column].trim().parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map_or(CpuUsage::Unavailable, CpuUsage::Estimate);

    Some(ProcessRecord {
        name: name.to_string(),
        pid,
        memory_mb,
        cpu,
    })
}

/// Whole megabytes, rounding half up.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB + u64::from(bytes % BYTES_PER_MB >= BYTES_PER_MB / 2)
}

fn parse_memory(raw: &str, unit_bytes: u64) -> Option<u64> {
    let value: u64 = raw.parse().ok()?;
    if value == 0 {
        return None;
    }
    value.checked_mul(unit_bytes)
}

fn split_fields(line: &str, layout: &RowLayout) -> Vec<String> {
    match layout.delimiter {
        Delimiter::Csv => split_csv(line),
        Delimiter::Whitespace => split_whitespace_with_tail(line, layout.name_column),
    }
}

fn split_csv(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Splits `leading` whitespace-separated fields, then keeps the rest of the
/// line as one final field.
fn split_whitespace_with_tail(line: &str, leading: usize) -> Vec<String> {
    let mut fields = Vec::with_capacity(leading + 1);
    let mut rest = line.trim();
    for _ in 0..leading {
        match rest.split_once(char::is_whitespace) {
            Some((head, tail)) => {
                fields.push(head.to_string());
                rest = tail.trim_start();
            }
            None => {
                // Too few columns; whatever is left is a short row.
                fields.push(rest.to_string());
                return fields;
            }
        }
    }
    fields.push(rest.to_string());
    fields
}
