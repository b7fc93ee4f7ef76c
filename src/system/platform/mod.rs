use crate::system::command::CommandSpec;
use crate::system::process::Pid;
use crate::system::snapshot::EnumerationDepth;

/// How fields are separated within one row of listing output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// Comma separated, fields optionally wrapped in double quotes.
    Csv,
    /// Whitespace separated; the name column must be last and takes the
    /// remainder of the line, since names may contain spaces.
    Whitespace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowLayout {
    pub delimiter: Delimiter,
    pub name_column: usize,
    pub pid_column: usize,
    pub memory_column: Option<usize>,
    /// Bytes per unit of the raw memory column.
    pub memory_unit_bytes: u64,
    pub cpu_column: Option<usize>,
}

impl RowLayout {
    pub fn min_fields(&self) -> usize {
        [
            Some(self.name_column),
            Some(self.pid_column),
            self.memory_column,
            self.cpu_column,
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// `tasklist /FO CSV /NH`: `"Image Name","PID","Session Name","Session#","Mem Usage"`.
pub const TASKLIST_CSV: RowLayout = RowLayout {
    delimiter: Delimiter::Csv,
    name_column: 0,
    pid_column: 1,
    memory_column: None,
    memory_unit_bytes: 1,
    cpu_column: None,
};

/// `wmic process get Name,ProcessId,WorkingSetSize /format:csv`:
/// `Node,Name,ProcessId,WorkingSetSize`, memory in bytes.
pub const WMIC_CSV: RowLayout = RowLayout {
    delimiter: Delimiter::Csv,
    name_column: 1,
    pid_column: 2,
    memory_column: Some(3),
    memory_unit_bytes: 1,
    cpu_column: None,
};

/// `ps -A -o pid=,comm=`
pub const PS_BASIC: RowLayout = RowLayout {
    delimiter: Delimiter::Whitespace,
    name_column: 1,
    pid_column: 0,
    memory_column: None,
    memory_unit_bytes: 1,
    cpu_column: None,
};

/// `ps -A -o pid=,rss=,pcpu=,comm=`, rss in KiB.
pub const PS_DETAILED: RowLayout = RowLayout {
    delimiter: Delimiter::Whitespace,
    name_column: 3,
    pid_column: 0,
    memory_column: Some(1),
    memory_unit_bytes: 1024,
    cpu_column: Some(2),
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingCommand {
    pub spec: CommandSpec,
    pub layout: RowLayout,
}

/// Per-process outcome lines counted from a bulk termination command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KillReport {
    pub terminated: usize,
    pub failed: usize,
}

pub trait PlatformCommands {
    fn listing(depth: EnumerationDepth) -> ListingCommand;
    fn kill_pid(pid: Pid) -> CommandSpec;
    fn kill_name(name: &str) -> CommandSpec;
    /// Command printing one PID per process a bulk kill by `name` would
    /// hit. Only needed where the kill command itself reports nothing.
    fn match_name(_name: &str) -> Option<CommandSpec> {
        None
    }
    /// `matched` is the PID count from [`match_name`](Self::match_name), if run.
    fn kill_report(stdout: &str, stderr: &str, matched: Option<usize>) -> KillReport;
}

pub mod macos;
pub mod unix;
pub mod windows;

#[cfg(target_os = "windows")]
use windows as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
use unix as platform_impl;

pub fn listing_command(depth: EnumerationDepth) -> ListingCommand {
    platform_impl::Platform::listing(depth)
}

pub fn kill_pid_command(pid: Pid) -> CommandSpec {
    platform_impl::Platform::kill_pid(pid)
}

pub fn kill_name_command(name: &str) -> CommandSpec {
    platform_impl::Platform::kill_name(name)
}

pub fn match_name_command(name: &str) -> Option<CommandSpec> {
    platform_impl::Platform::match_name(name)
}

pub fn parse_kill_report(stdout: &str, stderr: &str, matched: Option<usize>) -> KillReport {
    platform_impl::Platform::kill_report(stdout, stderr, matched)
}

/// Counts the PID lines printed by a [`match_name_command`].
pub fn parse_match_count(stdout: &str) -> usize {
    stdout
        .lines()
        .filter(|line| line.trim().parse::<Pid>().is_ok())
        .count()
}
