use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::state::AppState;

const HINTS: &[(&str, &str)] = &[
    ("j/k  \u{2191}/\u{2193}", "scroll focused pane"),
    ("PgUp/PgDn", "scroll a page"),
    ("g/G", "top / bottom"),
    ("h/l  \u{2190}/\u{2192}", "scroll sideways"),
    ("Tab", "switch pane"),
    ("n  ]", "next hunk"),
    ("p  [", "previous hunk"),
    ("y", "copy hunk (modified side)"),
    ("Y", "copy modified document"),
    ("R", "reload from disk"),
    ("t/T", "cycle theme"),
    ("c", "toggle connectors"),
    ("q", "quit"),
];

pub fn render_key_hints(frame: &mut Frame, state: &AppState) {
    let theme = &state.theme;
    let area = frame.area();
    let dialog_width = 46.min(area.width.saturating_sub(4));
    let dialog_height = (HINTS.len() as u16 + 2).min(area.height.saturating_sub(2));

    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let lines: Vec<Line> = HINTS
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<14}"),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*desc, Style::default().fg(theme.text)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), dialog_area);
}
