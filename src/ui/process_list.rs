use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::app::Phase;
use crate::format::{format_cpu, format_mb, pad_unicode};
use crate::system::group::ProcessGroup;
use crate::ui::category::categorize;
use crate::ui::theme::Theme;

const TAG_WIDTH: usize = 6;
const PID_WIDTH: usize = 10;
const CPU_WIDTH: usize = 8;
const MEM_WIDTH: usize = 10;
/// Groups at or above this total are highlighted.
const HIGH_MEMORY_MB: u64 = 1024;

pub struct ListView<'a> {
    pub groups: &'a [ProcessGroup],
    pub selected: usize,
    pub phase: Phase,
    pub awaiting_filter: bool,
    pub focused: bool,
}

pub fn render(frame: &mut Frame, area: Rect, view: &ListView<'_>, theme: &Theme) {
    let border_color = if view.focused {
        theme.overlay_border
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            " Processes ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.groups.is_empty() {
        let (title, description) = empty_message(view);
        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                description,
                Style::default().fg(theme.text_secondary),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let width = inner.width as usize;
    let height = inner.height as usize;
    if height == 0 {
        return;
    }

    let mut lines = vec![Line::from(Span::styled(
        format_row(width, "", "NAME", "PID", "CPU", "MEMORY"),
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    ))];

    let rows = height.saturating_sub(1);
    let offset = scroll_offset(view.selected, rows);
    for (i, group) in view.groups.iter().enumerate().skip(offset).take(rows) {
        let pid_column = match group.single_pid() {
            Some(pid) => pid.to_string(),
            None => format!("{}x", group.instance_count()),
        };
        let text = format_row(
            width,
            categorize(group.name()).tag(),
            group.name(),
            &pid_column,
            &format_cpu(group.avg_cpu()),
            &format_mb(group.total_memory_mb()),
        );

        let style = if i == view.selected {
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else if group.total_memory_mb() >= HIGH_MEMORY_MB {
            Style::default().fg(theme.memory_high)
        } else {
            Style::default().fg(theme.text_primary)
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn empty_message(view: &ListView<'_>) -> (&'static str, &'static str) {
    if view.phase == Phase::Loading {
        ("Loading Processes...", "Please wait...")
    } else if view.awaiting_filter {
        ("Search to list processes", "Press / and type part of a name.")
    } else {
        ("No Processes Found", "Could not find any running processes.")
    }
}

/// First visible row such that `selected` stays on screen.
pub fn scroll_offset(selected: usize, rows: usize) -> usize {
    if rows == 0 {
        return 0;
    }
    selected.saturating_sub(rows - 1)
}

fn format_row(width: usize, tag: &str, name: &str, pid: &str, cpu: &str, memory: &str) -> String {
    let fixed = 1 + TAG_WIDTH + 1 + PID_WIDTH + CPU_WIDTH + MEM_WIDTH + 1;
    let name_width = width.saturating_sub(fixed).max(8);
    let row = format!(
        " {}{}{:>pw$}{:>cw$}{:>mw$} ",
        pad_unicode(tag, TAG_WIDTH + 1),
        pad_unicode(name, name_width),
        pid,
        cpu,
        memory,
        pw = PID_WIDTH,
        cw = CPU_WIDTH,
        mw = MEM_WIDTH,
    );
    pad_unicode(&row, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(5, 0), 0);
    }

    #[test]
    fn row_fills_width_and_right_aligns_memory() {
        let row = format_row(60, "web", "chrome.exe", "3x", "n/a", "500 MB");
        assert_eq!(row.width(), 60);
        assert!(row.trim_end().ends_with("500 MB"));
        assert!(row.contains("chrome.exe"));
    }
}
