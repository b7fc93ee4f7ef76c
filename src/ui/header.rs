use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::app::Phase;
use crate::system::group::SortKey;
use crate::ui::theme::Theme;

pub struct HeaderInfo<'a> {
    pub sort_key: SortKey,
    pub group_count: usize,
    pub process_count: usize,
    pub phase: Phase,
    pub filter_text: &'a str,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo<'_>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![
        Span::styled(
            " taskreap ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Sort: ", Style::default().fg(theme.text_secondary)),
        Span::styled(
            info.sort_key.label(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} groups / {} processes", info.group_count, info.process_count),
            Style::default().fg(theme.text_primary),
        ),
    ];

    if !info.filter_text.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("\"{}\"", info.filter_text),
            Style::default().fg(theme.text_secondary),
        ));
    }

    let busy = match info.phase {
        Phase::Loading => Some("Loading..."),
        Phase::Killing => Some("Killing..."),
        Phase::Loaded => None,
    };
    if let Some(label) = busy {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            label,
            Style::default()
                .fg(theme.status_busy)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}
