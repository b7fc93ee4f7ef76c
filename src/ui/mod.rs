pub mod category;
pub mod header;
pub mod help;
pub mod instances;
pub mod process_list;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, InputMode};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        &header::HeaderInfo {
            sort_key: app.sort_key,
            group_count: app.groups.len(),
            process_count: app.records.len(),
            phase: app.phase,
            filter_text: &app.filter_text,
        },
        &app.theme,
    );

    let list_view = process_list::ListView {
        groups: &app.groups,
        selected: app.selected_index,
        phase: app.phase,
        awaiting_filter: app.awaiting_filter(),
        focused: app.input_mode != InputMode::Instances,
    };

    match app.selected_group() {
        Some(group) if app.input_mode == InputMode::Instances => {
            let h_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(30), Constraint::Length(36)])
                .split(chunks[1]);
            process_list::render(frame, h_chunks[0], &list_view, &app.theme);
            instances::render(frame, h_chunks[1], group, app.instance_index, &app.theme);
        }
        _ => process_list::render(frame, chunks[1], &list_view, &app.theme),
    }

    statusbar::render(
        frame,
        chunks[2],
        app.input_mode,
        &app.filter_text,
        app.notification.as_ref(),
        &app.keybinds,
        &app.theme,
    );

    // Help overlay last, so it draws on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}

#[cfg(test)]
mod tests;
