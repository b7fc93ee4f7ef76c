use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::{format_cpu, format_memory, truncate_unicode};
use crate::system::group::ProcessGroup;
use crate::ui::process_list::scroll_offset;
use crate::ui::theme::Theme;

/// Per-instance list for the selected group, so one PID can be picked.
pub fn render(frame: &mut Frame, area: Rect, group: &ProcessGroup, selected: usize, theme: &Theme) {
    let title = truncate_unicode(group.name(), area.width.saturating_sub(12) as usize);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" {title} ({}) ", group.instance_count()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = inner.height as usize;
    let offset = scroll_offset(selected, rows);
    let lines: Vec<Line> = group
        .instances()
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, instance)| {
            let text = format!(
                " #{:<3} PID {:<8} {:>7} {:>7}",
                i + 1,
                instance.pid,
                format_cpu(instance.cpu),
                format_memory(instance.memory_mb)
            );
            let style = if i == selected {
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_primary)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
