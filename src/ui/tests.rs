use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::action::{Action, Direction};
use crate::app::{App, InputMode, Phase, ResolvedKeybinds};
use crate::config::{Config, KeybindsConfig};
use crate::system::group::{SortKey, group_processes};
use crate::system::process::{CpuUsage, ProcessRecord};
use crate::ui::theme::Theme;
use crate::ui::{header, instances, statusbar};

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn record(name: &str, pid: u32, memory_mb: u64, cpu: f32) -> ProcessRecord {
    ProcessRecord {
        name: name.to_string(),
        pid,
        memory_mb: Some(memory_mb),
        cpu: CpuUsage::Estimate(cpu),
    }
}

fn sample() -> Vec<ProcessRecord> {
    vec![
        record("chrome.exe", 9999, 300, 1.5),
        record("chrome.exe", 10000, 200, 0.5),
        record("notepad.exe", 1234, 10, 0.0),
    ]
}

fn draw_app(app: &App, width: u16, height: u16) -> String {
    render_to_string(width, height, |frame| super::draw(frame, app))
}

#[test]
fn loading_screen_before_first_snapshot() {
    let app = App::new(&Config::default());
    let output = draw_app(&app, 80, 12);
    assert!(output.contains("Loading Processes..."));
    assert!(output.contains("Loading..."));
}

#[test]
fn loaded_list_shows_groups_and_instance_counts() {
    let mut app = App::new(&Config::default());
    app.apply_snapshot(Ok(sample()), true);
    let output = draw_app(&app, 80, 12);

    assert!(output.contains("chrome.exe"));
    assert!(output.contains("2x"));
    assert!(output.contains("500 MB"));
    assert!(output.contains("1234"));
    assert!(output.contains("~1.0%"));
    assert!(output.contains("2 groups / 3 processes"));
    assert!(output.contains("Processes Loaded"));
}

#[test]
fn empty_snapshot_shows_no_processes_message() {
    let mut app = App::new(&Config::default());
    app.apply_snapshot(Ok(Vec::new()), false);
    let output = draw_app(&app, 80, 12);
    assert!(output.contains("No Processes Found"));
}

#[test]
fn empty_start_prompts_for_search() {
    let mut config = Config::default();
    config.general.empty_start = true;
    let mut app = App::new(&config);
    app.apply_snapshot(Ok(sample()), false);
    let output = draw_app(&app, 80, 12);
    assert!(output.contains("Search to list processes"));
    assert!(!output.contains("chrome.exe"));
}

#[test]
fn instances_panel_lists_each_pid() {
    let mut app = App::new(&Config::default());
    app.apply_snapshot(Ok(sample()), false);
    app.dispatch(Action::ToggleInstances);
    app.dispatch(Action::Navigate(Direction::Down));
    assert_eq!(app.input_mode, InputMode::Instances);

    let output = draw_app(&app, 100, 12);
    assert!(output.contains("chrome.exe (2)"));
    assert!(output.contains("PID 9999"));
    assert!(output.contains("PID 10000"));
}

#[test]
fn instances_panel_renders_standalone() {
    let groups = group_processes(&sample(), SortKey::Name);
    let output = render_to_string(36, 5, |frame| {
        instances::render(frame, Rect::new(0, 0, 36, 5), &groups[0], 1, &Theme::dark());
    });
    assert!(output.contains("#2"));
    assert!(output.contains("200 MB"));
}

#[test]
fn help_overlay_lists_keybinds() {
    let mut app = App::new(&Config::default());
    app.apply_snapshot(Ok(sample()), false);
    app.dispatch(Action::ToggleHelp);
    let output = draw_app(&app, 80, 20);
    assert!(output.contains("Keys"));
    assert!(output.contains("Kill all with this name"));
}

#[test]
fn header_reports_killing_phase() {
    let output = render_to_string(80, 3, |frame| {
        header::render(
            frame,
            Rect::new(0, 0, 80, 3),
            &header::HeaderInfo {
                sort_key: SortKey::Cpu,
                group_count: 4,
                process_count: 9,
                phase: Phase::Killing,
                filter_text: "chr",
            },
            &Theme::dark(),
        );
    });
    assert!(output.contains("Sort: CPU"));
    assert!(output.contains("\"chr\""));
    assert!(output.contains("Killing..."));
}

#[test]
fn statusbar_shows_configured_keys() {
    let keybinds = ResolvedKeybinds::from_config(&KeybindsConfig {
        kill: "d".to_string(),
        ..KeybindsConfig::default()
    });
    let output = render_to_string(120, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 120, 1),
            InputMode::Normal,
            "",
            None,
            &keybinds,
            &Theme::light(),
        );
    });
    assert!(output.contains(" d  Kill"));
    assert!(output.contains(" q  Quit"));
}

#[test]
fn statusbar_prefers_notification_outside_filter_mode() {
    let mut app = App::new(&Config::default());
    app.apply_snapshot(Ok(sample()), true);
    let note = app.notification.clone();

    let normal = render_to_string(80, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 80, 1),
            InputMode::Normal,
            "",
            note.as_ref(),
            &app.keybinds,
            &app.theme,
        );
    });
    assert!(normal.contains("Processes Loaded"));
    assert!(normal.contains("Found 3 processes."));

    let filtering = render_to_string(80, 1, |frame| {
        statusbar::render(
            frame,
            Rect::new(0, 0, 80, 1),
            InputMode::Filter,
            "chr",
            note.as_ref(),
            &app.keybinds,
            &app.theme,
        );
    });
    assert!(filtering.contains("chr"));
    assert!(!filtering.contains("Processes Loaded"));
}
