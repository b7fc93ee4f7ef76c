use super::{KillReport, ListingCommand, PlatformCommands, TASKLIST_CSV, WMIC_CSV};
use crate::system::command::CommandSpec;
use crate::system::process::Pid;
use crate::system::snapshot::EnumerationDepth;

pub struct Platform;

impl PlatformCommands for Platform {
    fn listing(depth: EnumerationDepth) -> ListingCommand {
        match depth {
            EnumerationDepth::Basic => ListingCommand {
                spec: CommandSpec::new("tasklist").args(["/FO", "CSV", "/NH"]),
                layout: TASKLIST_CSV,
            },
            EnumerationDepth::Detailed => ListingCommand {
                spec: CommandSpec::new("wmic").args([
                    "process",
                    "get",
                    "Name,ProcessId,WorkingSetSize",
                    "/format:csv",
                ]),
                layout: WMIC_CSV,
            },
        }
    }

    fn kill_pid(pid: Pid) -> CommandSpec {
        CommandSpec::new("taskkill")
            .args(["/F", "/PID"])
            .arg(pid.to_string())
    }

    fn kill_name(name: &str) -> CommandSpec {
        CommandSpec::new("taskkill").args(["/F", "/IM", name])
    }

    fn kill_report(stdout: &str, stderr: &str, _matched: Option<usize>) -> KillReport {
        let mut report = KillReport::default();
        for line in stdout.lines().chain(stderr.lines()) {
            let line = line.trim();
            if line.starts_with("SUCCESS:") {
                report.terminated += 1;
            } else if line.starts_with("ERROR:") && line.contains("PID") {
                // "ERROR: The process "x.exe" not found." names no PID and
                // is not an attempt on a running instance.
                report.failed += 1;
            }
        }
        report
    }
}
