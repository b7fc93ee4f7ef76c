use crate::system::process::Pid;

#[derive(Debug, Clone, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    Kill { pid: Pid, name: String },
    KillAll { name: String, instances: usize },
    ToggleInstances,
    EnterFilterMode,
    ExitFilterMode,
    ClearFilter,
    UpdateFilter(String),
    CycleSortMode,
    Refresh,
    ToggleHelp,
    DismissNotification,
    None,
}
