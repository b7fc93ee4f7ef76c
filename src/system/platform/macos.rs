use super::{KillReport, ListingCommand, PS_BASIC, PS_DETAILED, PlatformCommands};
use crate::system::command::CommandSpec;
use crate::system::process::Pid;
use crate::system::snapshot::EnumerationDepth;

pub struct Platform;

impl PlatformCommands for Platform {
    fn listing(depth: EnumerationDepth) -> ListingCommand {
        // `comm` is the full executable path here; `ucomm` is the short
        // accounting name that `pkill -x` matches against.
        match depth {
            EnumerationDepth::Basic => ListingCommand {
                spec: CommandSpec::new("ps").args(["-A", "-o", "pid=,ucomm="]),
                layout: PS_BASIC,
            },
            EnumerationDepth::Detailed => ListingCommand {
                spec: CommandSpec::new("ps").args(["-A", "-o", "pid=,rss=,pcpu=,ucomm="]),
                layout: PS_DETAILED,
            },
        }
    }

    fn kill_pid(pid: Pid) -> CommandSpec {
        CommandSpec::new("kill").arg("-9").arg(pid.to_string())
    }

    fn match_name(name: &str) -> Option<CommandSpec> {
        Some(CommandSpec::new("pgrep").args(["-x", name]))
    }

    fn kill_name(name: &str) -> CommandSpec {
        // BSD pkill has no -e, so it prints nothing on success.
        CommandSpec::new("pkill").args(["-9", "-x", name])
    }

    fn kill_report(_stdout: &str, stderr: &str, matched: Option<usize>) -> KillReport {
        // "pkill: signalling pid 1234: Operation not permitted"
        let failed = stderr
            .lines()
            .filter(|line| line.contains("signalling pid"))
            .count();
        KillReport {
            terminated: matched.unwrap_or(0).saturating_sub(failed),
            failed,
        }
    }
}
