use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, Notification, ResolvedKeybinds, Severity, key_label};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: InputMode,
    filter_text: &str,
    notification: Option<&Notification>,
    keybinds: &ResolvedKeybinds,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Notifications take priority, except while typing a search.
    if let Some(note) = notification
        && input_mode != InputMode::Filter
    {
        let (marker, color) = match note.severity {
            Severity::Animated => ("\u{2026}", theme.status_busy),
            Severity::Success => ("\u{2713}", theme.status_ok),
            Severity::Failure => ("\u{2717}", theme.status_err),
        };
        let mut spans = vec![Span::styled(
            format!(" {marker} {}", note.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if !note.message.is_empty() {
            spans.push(Span::styled(
                format!("  {}", note.message),
                Style::default().fg(theme.pill_desc_fg),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
        return;
    }

    let line = match input_mode {
        InputMode::Filter => {
            let mut spans = vec![
                Span::styled(
                    " / ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {filter_text}"),
                    Style::default().fg(theme.pill_desc_fg),
                ),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Apply", theme));
            Line::from(spans)
        }
        InputMode::Instances => {
            let mut spans = Vec::new();
            spans.extend(pill_spans(&key_label(keybinds.kill), "Kill instance", theme));
            spans.extend(pill_spans(&key_label(keybinds.kill_all), "Kill all", theme));
            spans.extend(pill_spans("Esc", "Back", theme));
            spans.extend(pill_spans("\u{2191}\u{2193}", "Nav", theme));
            Line::from(spans)
        }
        InputMode::Normal | InputMode::Help => {
            let mut spans = Vec::new();
            spans.extend(pill_spans(&key_label(keybinds.quit), "Quit", theme));
            spans.extend(pill_spans(&key_label(keybinds.filter), "Search", theme));
            spans.extend(pill_spans(&key_label(keybinds.kill), "Kill", theme));
            spans.extend(pill_spans(&key_label(keybinds.kill_all), "Kill all", theme));
            spans.extend(pill_spans(&key_label(keybinds.instances), "Instances", theme));
            spans.extend(pill_spans(&key_label(keybinds.cycle_sort), "Sort", theme));
            spans.extend(pill_spans(&key_label(keybinds.refresh), "Refresh", theme));
            spans.extend(pill_spans(&key_label(keybinds.help), "Help", theme));
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn pill_spans(key: &str, desc: &str, theme: &Theme) -> Vec<Span<'static>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}
