use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::diff::DiffAlgorithm;
use crate::state::AppState;

use super::Component;

pub struct ContextBar;

/// "hunk 2/5", or a note when there is nothing to navigate.
pub fn hunk_label(state: &AppState) -> String {
    if state.model.is_identical() {
        return "identical".to_string();
    }
    match state.hunks.current_index() {
        Some(i) => format!("hunk {}/{}", i + 1, state.hunks.len()),
        None => "no changes".to_string(),
    }
}

impl Component for ContextBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let stats = state.model.stats;

        let mut spans = vec![
            Span::styled(" twindiff ", Style::default().fg(Color::Black).bg(theme.accent)),
            Span::raw("  "),
            Span::styled(
                state.left_title.as_str(),
                Style::default()
                    .fg(theme.diff_del_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" \u{2192} ", Style::default().fg(theme.text_muted)),
            Span::styled(
                state.right_title.as_str(),
                Style::default()
                    .fg(theme.diff_add_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("+{}", stats.added),
                Style::default().fg(theme.diff_add_fg),
            ),
            Span::raw(" "),
            Span::styled(
                format!("-{}", stats.removed),
                Style::default().fg(theme.diff_del_fg),
            ),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", hunk_label(state)),
                Style::default().fg(theme.secondary),
            ),
        ];

        if !state.grammar.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("[{}]", state.grammar),
                Style::default().fg(theme.text_muted),
            ));
        }
        if state.model.algorithm == DiffAlgorithm::Myers {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("[{}]", state.model.algorithm.label()),
                Style::default().fg(theme.warning),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
