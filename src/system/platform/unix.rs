use super::{KillReport, ListingCommand, PS_BASIC, PS_DETAILED, PlatformCommands};
use crate::system::command::CommandSpec;
use crate::system::process::Pid;
use crate::system::snapshot::EnumerationDepth;

pub struct Platform;

impl PlatformCommands for Platform {
    fn listing(depth: EnumerationDepth) -> ListingCommand {
        match depth {
            EnumerationDepth::Basic => ListingCommand {
                spec: CommandSpec::new("ps").args(["-A", "-o", "pid=,comm="]),
                layout: PS_BASIC,
            },
            EnumerationDepth::Detailed => ListingCommand {
                spec: CommandSpec::new("ps").args(["-A", "-o", "pid=,rss=,pcpu=,comm="]),
                layout: PS_DETAILED,
            },
        }
    }

    fn kill_pid(pid: Pid) -> CommandSpec {
        CommandSpec::new("kill").arg("-9").arg(pid.to_string())
    }

    fn kill_name(name: &str) -> CommandSpec {
        // -x: exact match on the same short name `ps -o comm=` reports.
        // -e: echo one line per signalled process so the result can be counted.
        CommandSpec::new("pkill").args(["-9", "-e", "-x", name])
    }

    fn kill_report(stdout: &str, stderr: &str, _matched: Option<usize>) -> KillReport {
        // procps-ng: "chrome killed (pid 1234)" and
        // "pkill: killing pid 1234 failed: Operation not permitted"
        KillReport {
            terminated: stdout
                .lines()
                .filter(|line| line.contains("killed (pid"))
                .count(),
            failed: stderr
                .lines()
                .filter(|line| line.contains("killing pid") && line.contains("failed"))
                .count(),
        }
    }
}
