use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::action::{Action, Direction};
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::system::group::{ProcessGroup, SortKey, group_processes};
use crate::system::kill::{KillAllOutcome, TerminationError, TerminationExecutor};
use crate::system::process::{Pid, ProcessRecord};
use crate::system::snapshot::{EnumerationError, SnapshotReader};
use crate::ui::theme::Theme;

const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Instances,
    Help,
}

/// `Loading -> Loaded <-> (Killing -> Loading)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
    Killing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Animated,
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub created: Instant,
}

impl Notification {
    fn new(severity: Severity, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
            created: Instant::now(),
        }
    }
}

/// Work that has to await an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// `announce: false` keeps the notification of the kill that caused it.
    Refresh { announce: bool },
    Kill { pid: Pid, name: String },
    KillAll { name: String, instances: usize },
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub filter: KeyCode,
    pub kill: KeyCode,
    pub kill_all: KeyCode,
    pub instances: KeyCode,
    pub cycle_sort: KeyCode,
    pub refresh: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            kill: parse_key(&kb.kill).unwrap_or(KeyCode::Char('x')),
            kill_all: parse_key(&kb.kill_all).unwrap_or(KeyCode::Char('X')),
            instances: parse_key(&kb.instances).unwrap_or(KeyCode::Enter),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Search processes"),
            (key_label(self.kill), "Kill process / group"),
            (key_label(self.kill_all), "Kill all with this name"),
            (key_label(self.instances), "Show instances"),
            (key_label(self.cycle_sort), "Cycle sort"),
            (key_label(self.refresh), "Refresh list"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("↑↓".to_string(), "Navigate"));
        entries.push(("Esc".to_string(), "Back / dismiss"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "?".to_string(),
    }
}

/// Ctrl+C, which quits from every mode.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub struct App {
    pub running: bool,
    pub phase: Phase,
    /// Latest snapshot, replaced wholesale on every refresh.
    pub records: Vec<ProcessRecord>,
    /// Groups derived from `records`, filtered and sorted for display.
    pub groups: Vec<ProcessGroup>,
    pub sort_key: SortKey,
    pub filter_text: String,
    pub empty_start: bool,
    pub selected_index: usize,
    pub instance_index: usize,
    pub input_mode: InputMode,
    pub notification: Option<Notification>,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    /// When the list last became current. Earlier key presses were aimed
    /// at a list that has since been replaced.
    settled_at: Instant,
    reader: SnapshotReader,
    executor: TerminationExecutor,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let timeout = config.general.command_timeout();
        App {
            running: true,
            phase: Phase::Loading,
            records: Vec::new(),
            groups: Vec::new(),
            sort_key: config.general.sort_key(),
            filter_text: String::new(),
            empty_start: config.general.empty_start,
            selected_index: 0,
            instance_index: 0,
            input_mode: InputMode::Normal,
            notification: None,
            theme: Theme::from_config(&config.general.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            settled_at: Instant::now(),
            reader: SnapshotReader::new(config.general.depth(), timeout),
            executor: TerminationExecutor::new(timeout),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Loaded
    }

    pub fn selected_group(&self) -> Option<&ProcessGroup> {
        self.groups.get(self.selected_index)
    }

    pub fn selected_instance(&self) -> Option<&ProcessRecord> {
        self.selected_group()
            .and_then(|g| g.instances().get(self.instance_index))
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    /// True when the list is deliberately empty until a search is typed.
    pub fn awaiting_filter(&self) -> bool {
        self.empty_start && self.filter_text.is_empty()
    }

    /// Maps and applies a key press read at `received`.
    ///
    /// Presses read before the current list settled (typed while a kill or
    /// refresh was running) are dropped, so they never land on whatever row
    /// the refresh moved under the cursor. Ctrl+C is always honoured.
    pub fn handle_key(&mut self, key: KeyEvent, received: Instant) -> Option<Task> {
        if received <= self.settled_at && !is_interrupt(&key) {
            debug!(code = ?key.code, "dropping key pressed before the list settled");
            return None;
        }
        let action = self.map_key(key);
        self.dispatch(action)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if is_interrupt(&key) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Instances => self.map_key_instances(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_navigation(code: KeyCode) -> Option<Action> {
        let direction = match code {
            KeyCode::Up => Direction::Up,
            KeyCode::Down => Direction::Down,
            KeyCode::Home => Direction::Top,
            KeyCode::End => Direction::Bottom,
            _ => return None,
        };
        Some(Action::Navigate(direction))
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        if let Some(action) = Self::map_navigation(code) {
            return action;
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.kill {
            // One instance: kill it by PID. Several: kill them all by name.
            return match self.selected_group() {
                Some(group) => match group.single_pid() {
                    Some(pid) => Action::Kill {
                        pid,
                        name: group.name().to_string(),
                    },
                    None => Action::KillAll {
                        name: group.name().to_string(),
                        instances: group.instance_count(),
                    },
                },
                None => Action::None,
            };
        }
        if code == kb.kill_all {
            return self.kill_all_selected();
        }
        if code == kb.instances {
            return match self.selected_group() {
                Some(group) if group.instance_count() > 1 => Action::ToggleInstances,
                _ => Action::None,
            };
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == KeyCode::Esc && self.notification.is_some() {
            return Action::DismissNotification;
        }

        Action::None
    }

    fn map_key_instances(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        if let Some(action) = Self::map_navigation(code) {
            return action;
        }
        if code == KeyCode::Esc || code == kb.instances {
            return Action::ToggleInstances;
        }
        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.kill {
            return match (self.selected_group(), self.selected_instance()) {
                (Some(group), Some(instance)) => Action::Kill {
                    pid: instance.pid,
                    name: group.name().to_string(),
                },
                _ => Action::None,
            };
        }
        if code == kb.kill_all {
            return self.kill_all_selected();
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    fn kill_all_selected(&self) -> Action {
        match self.selected_group() {
            Some(group) => Action::KillAll {
                name: group.name().to_string(),
                instances: group.instance_count(),
            },
            None => Action::None,
        }
    }

    /// Applies a state transition. Returns the command work the caller has
    /// to run, if any.
    pub fn dispatch(&mut self, action: Action) -> Option<Task> {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(direction) => self.navigate(direction),
            Action::EnterFilterMode => self.input_mode = InputMode::Filter,
            Action::ExitFilterMode => self.input_mode = InputMode::Normal,
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.regroup();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.regroup();
                // A new search starts at the best match.
                self.selected_index = 0;
                self.instance_index = 0;
            }
            Action::CycleSortMode => {
                self.sort_key = self.sort_key.next();
                self.regroup();
            }
            Action::ToggleInstances => {
                self.input_mode = if self.input_mode == InputMode::Instances {
                    InputMode::Normal
                } else {
                    InputMode::Instances
                };
                self.instance_index = 0;
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::DismissNotification => self.notification = None,
            Action::Refresh => {
                if !self.is_busy() {
                    return Some(Task::Refresh { announce: true });
                }
            }
            Action::Kill { pid, name } => {
                if self.is_busy() {
                    return None;
                }
                if pid == 0 {
                    let err = TerminationError::InvalidTarget("PID 0".to_string());
                    self.notify(Severity::Failure, "Error Terminating Process", err.to_string());
                    return None;
                }
                return Some(Task::Kill { pid, name });
            }
            Action::KillAll { name, instances } => {
                if !self.is_busy() {
                    return Some(Task::KillAll { name, instances });
                }
            }
            Action::None => {}
        }
        None
    }

    /// Moves into the phase for `task` before it is awaited, so the
    /// in-progress state can be drawn.
    pub fn begin_task(&mut self, task: &Task) {
        match task {
            Task::Refresh { announce } => {
                self.phase = Phase::Loading;
                if *announce {
                    self.notify(Severity::Animated, "Processes being loaded...", "");
                }
            }
            Task::Kill { pid, name } => {
                self.phase = Phase::Killing;
                self.notify(
                    Severity::Animated,
                    "Terminating...",
                    format!("{name} (PID: {pid})"),
                );
            }
            Task::KillAll { name, instances } => {
                self.phase = Phase::Killing;
                self.notify(
                    Severity::Animated,
                    "Terminating...",
                    format!("{instances} instance(s) of {name}"),
                );
            }
        }
    }

    /// Runs one task to completion. A kill always yields a follow-up
    /// refresh, whatever its outcome.
    pub async fn run_task(&mut self, task: Task) -> Option<Task> {
        match task {
            Task::Refresh { announce } => {
                let result = self.reader.list_processes().await;
                self.apply_snapshot(result, announce);
                None
            }
            Task::Kill { pid, name } => {
                let target = ProcessRecord::basic(name, pid);
                let result = self.executor.kill_process(&target).await;
                self.apply_kill_result(&target.name, pid, result);
                Some(Task::Refresh { announce: false })
            }
            Task::KillAll { name, .. } => {
                let result = self.executor.kill_all_by_name(&name).await;
                self.apply_kill_all_result(&name, result);
                Some(Task::Refresh { announce: false })
            }
        }
    }

    pub fn apply_snapshot(
        &mut self,
        result: Result<Vec<ProcessRecord>, EnumerationError>,
        announce: bool,
    ) {
        match result {
            Ok(records) => {
                debug!(count = records.len(), "snapshot applied");
                if announce {
                    self.notify(
                        Severity::Success,
                        "Processes Loaded",
                        format!("Found {} processes.", records.len()),
                    );
                }
                self.records = records;
            }
            Err(err) => {
                self.records.clear();
                self.notify(Severity::Failure, "Error Fetching Processes", err.to_string());
            }
        }
        self.phase = Phase::Loaded;
        self.settled_at = Instant::now();
        self.regroup();
    }

    pub fn apply_kill_result(&mut self, name: &str, pid: Pid, result: Result<(), TerminationError>) {
        match result {
            Ok(()) => self.notify(
                Severity::Success,
                "Process Terminated",
                format!("Killed {name} (PID: {pid})"),
            ),
            Err(err) => self.notify(Severity::Failure, "Error Terminating Process", err.to_string()),
        }
        self.phase = Phase::Loading;
    }

    pub fn apply_kill_all_result(
        &mut self,
        name: &str,
        result: Result<KillAllOutcome, TerminationError>,
    ) {
        match result {
            Ok(outcome) if outcome.partial => self.notify(
                Severity::Success,
                "Processes Partially Terminated",
                format!(
                    "Killed {} of {} processes named {name}. Some could not be stopped.",
                    outcome.terminated, outcome.attempted
                ),
            ),
            Ok(_) => self.notify(
                Severity::Success,
                "Processes Terminated",
                format!("Killed all processes named {name}"),
            ),
            Err(err) => self.notify(
                Severity::Failure,
                "Error Terminating Processes",
                format!("{err}. They may have already been terminated."),
            ),
        }
        self.phase = Phase::Loading;
    }

    pub fn on_tick(&mut self) {
        if let Some(notification) = &self.notification
            && notification.severity != Severity::Animated
            && notification.created.elapsed() >= NOTIFICATION_TTL
        {
            self.notification = None;
        }
    }

    fn notify(&mut self, severity: Severity, title: &str, message: impl Into<String>) {
        self.notification = Some(Notification::new(severity, title, message));
    }

    fn regroup(&mut self) {
        let selected_name = self.selected_group().map(|g| g.name().to_string());

        let mut groups = group_processes(&self.records, self.sort_key);
        if self.awaiting_filter() {
            groups.clear();
        } else {
            groups.retain(|g| g.matches_filter(&self.filter_text));
        }
        self.groups = groups;

        // Keep the cursor on the same group across refreshes when it survives.
        self.selected_index = selected_name
            .and_then(|name| self.groups.iter().position(|g| g.name() == name))
            .unwrap_or_else(|| self.selected_index.min(self.groups.len().saturating_sub(1)));

        let instances = self.selected_group().map_or(0, ProcessGroup::instance_count);
        if self.input_mode == InputMode::Instances && instances <= 1 {
            self.input_mode = InputMode::Normal;
        }
        self.instance_index = self.instance_index.min(instances.saturating_sub(1));
    }

    fn navigate(&mut self, direction: Direction) {
        let (index, len) = if self.input_mode == InputMode::Instances {
            let len = self.selected_group().map_or(0, ProcessGroup::instance_count);
            (&mut self.instance_index, len)
        } else {
            (&mut self.selected_index, self.groups.len())
        };
        if len == 0 {
            *index = 0;
            return;
        }
        *index = match direction {
            Direction::Up => index.saturating_sub(1),
            Direction::Down => (*index + 1).min(len - 1),
            Direction::Top => 0,
            Direction::Bottom => len - 1,
        };
    }
}
