use taskreap::system::command::CommandOutput;
use taskreap::system::group::{SortKey, group_processes};
use taskreap::system::kill::{TerminationError, evaluate_kill_all};
use taskreap::system::platform::{
    PS_BASIC, PS_DETAILED, PlatformCommands, TASKLIST_CSV, WMIC_CSV, parse_kill_report, windows,
};
use taskreap::system::process::CpuUsage;
use taskreap::system::snapshot::parse_listing;

#[test]
fn basic_listing_groups_into_two_names() {
    let text = "\"notepad.exe\",\"1234\",\"Console\",\"1\",\"10,240 K\"\r\n\
                \"notepad.exe\",\"5678\",\"Console\",\"1\",\"9,812 K\"\r\n\
                \"chrome.exe\",\"9999\",\"Console\",\"1\",\"300,000 K\"\r\n";
    let records = parse_listing(text, &TASKLIST_CSV);
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.memory_mb.is_none()));

    let groups = group_processes(&records, SortKey::Name);
    let summary: Vec<(&str, usize)> = groups
        .iter()
        .map(|g| (g.name(), g.instance_count()))
        .collect();
    assert_eq!(summary, vec![("chrome.exe", 1), ("notepad.exe", 2)]);
}

#[test]
fn detailed_row_converts_working_set_to_megabytes() {
    let text = "\r\nNode,Name,ProcessId,WorkingSetSize\r\n\
                DESKTOP-1,chrome.exe,9999,104857600\r\n";
    let records = parse_listing(text, &WMIC_CSV);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "chrome.exe");
    assert_eq!(records[0].pid, 9999);
    assert_eq!(records[0].memory_mb, Some(100));
}

#[test]
fn detailed_rows_with_zero_or_garbage_memory_are_dropped() {
    let text = "Node,Name,ProcessId,WorkingSetSize\n\
                H,keep.exe,1,2097152\n\
                H,zero.exe,2,0\n\
                H,garbage.exe,3,lots\n\
                H,,4,2097152\n\
                H,short.exe\n";
    let records = parse_listing(text, &WMIC_CSV);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["keep.exe"]);
    assert_eq!(records[0].memory_mb, Some(2));
}

#[test]
fn ps_listings_keep_names_with_spaces() {
    let basic = "    1 systemd\n  812 Web Content\n  abc broken\n";
    let records = parse_listing(basic, &PS_BASIC);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Web Content", "systemd"]);

    let detailed = "  812 204800  3.5 Web Content\n  900      0  0.0 idle\n";
    let records = parse_listing(detailed, &PS_DETAILED);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Web Content");
    assert_eq!(records[0].memory_mb, Some(200));
    assert_eq!(records[0].cpu, CpuUsage::Estimate(3.5));
}

#[test]
fn partial_bulk_kill_is_non_fatal() {
    let output = CommandOutput {
        success: false,
        code: Some(128),
        stdout: "SUCCESS: The process \"chrome.exe\" with PID 9999 has been terminated.\r\n\
                 SUCCESS: The process \"chrome.exe\" with PID 10000 has been terminated.\r\n"
            .to_string(),
        stderr: "ERROR: The process \"chrome.exe\" with PID 10001 could not be terminated.\r\n\
                 Reason: Access is denied.\r\n"
            .to_string(),
    };
    let report = windows::Platform::kill_report(&output.stdout, &output.stderr, None);
    let outcome = evaluate_kill_all("chrome.exe", &output, report).unwrap();
    assert_eq!(outcome.attempted, 3);
    assert_eq!(outcome.terminated, 2);
    assert!(outcome.partial);
}

#[test]
fn bulk_kill_without_matches_is_an_error() {
    let output = CommandOutput {
        success: false,
        code: Some(1),
        stdout: String::new(),
        stderr: String::new(),
    };
    let report = parse_kill_report(&output.stdout, &output.stderr, Some(0));
    let err = evaluate_kill_all("ghost", &output, report).unwrap_err();
    assert!(matches!(err, TerminationError::NoMatch { .. }));
}
