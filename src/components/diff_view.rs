use std::ops::Range;

use unicode_width::UnicodeWidthChar;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::diff::{Line, LineKind};
use crate::highlight::Markup;
use crate::state::hunk_state::block_for_hunk;
use crate::state::{AppState, Side};
use crate::theme::Theme;

use super::Component;

/// One side of the diff: line numbers, change markers and highlighted text,
/// offset by the pane's scroll position.
pub struct DiffView {
    pub side: Side,
}

/// Rows and text columns available inside a bordered pane.
pub fn text_viewport(area: Rect, number_width: usize) -> (u16, u16) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let prefix = prefix_width(number_width) as u16;
    (inner.height, inner.width.saturating_sub(prefix))
}

fn prefix_width(number_width: usize) -> usize {
    number_width + 2
}

impl Component for DiffView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let is_focused = state.focus == self.side;
        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let title = match self.side {
            Side::Left => &state.left_title,
            Side::Right => &state.right_title,
        };
        let block = Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);

        let lines = state.model.lines(self.side.is_left());
        if lines.is_empty() {
            let paragraph = Paragraph::new(" (empty)")
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let pane = state.panes.pane(self.side);
        let first = pane.first_row();
        let skip = pane.first_column();
        let number_width = state.number_width(self.side);
        let text_width = (inner.width as usize).saturating_sub(prefix_width(number_width));
        let current = current_hunk_range(state, self.side);

        let rows: Vec<TextLine> = lines
            .iter()
            .enumerate()
            .skip(first)
            .take(inner.height as usize)
            .map(|(idx, line)| {
                let in_hunk = current.as_ref().is_some_and(|r| r.contains(&idx));
                make_line(line, number_width, skip, text_width, in_hunk, theme)
            })
            .collect();

        frame.render_widget(Paragraph::new(rows).block(block), area);
    }
}

/// Line range of the current hunk on `side`.
fn current_hunk_range(state: &AppState, side: Side) -> Option<Range<usize>> {
    let line = state.hunks.current_line()?;
    let block = block_for_hunk(&state.model, line)?;
    Some(match side {
        Side::Left => block.left_start..block.left_start + block.left_count,
        Side::Right => block.right_start..block.right_start + block.right_count,
    })
}

fn kind_style(kind: LineKind, theme: &Theme) -> (char, Option<Color>, Color) {
    match kind {
        LineKind::Added => ('+', Some(theme.diff_add_bg), theme.diff_add_fg),
        LineKind::Removed => ('-', Some(theme.diff_del_bg), theme.diff_del_fg),
        LineKind::Unchanged => (' ', None, theme.text_muted),
    }
}

fn make_line<'a>(
    line: &Line,
    number_width: usize,
    skip: usize,
    width: usize,
    in_hunk: bool,
    theme: &Theme,
) -> TextLine<'a> {
    let (marker, bg, marker_fg) = kind_style(line.kind, theme);

    let mut number_style = Style::default().fg(theme.text_muted);
    let mut marker_style = Style::default().fg(marker_fg);
    if let Some(bg) = bg {
        number_style = number_style.bg(bg);
        marker_style = marker_style.bg(bg);
    }
    if in_hunk {
        number_style = number_style
            .fg(theme.current_hunk_fg)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::styled(format!("{:>number_width$}", line.num), number_style),
        Span::styled(format!("{marker} "), marker_style),
    ];
    spans.extend(visible_spans(&line.markup, skip, width, bg, theme));
    TextLine::from(spans)
}

/// Cut the markup to the horizontally visible columns `[skip, skip + width)`,
/// styling each piece with its syntax color. Columns are display cells, so a
/// wide character cut by either edge is replaced by blanks.
fn visible_spans<'a>(
    markup: &Markup,
    skip: usize,
    width: usize,
    bg: Option<Color>,
    theme: &Theme,
) -> Vec<Span<'a>> {
    let mut out = Vec::new();
    let end = skip + width;
    let mut col = 0;
    let mut used = 0;
    for span in markup.spans() {
        if col >= end {
            break;
        }
        let mut text = String::new();
        for c in span.text.chars() {
            let w = c.width().unwrap_or(0);
            let start = col;
            col += w;
            if w == 0 {
                // Combining marks ride on the previous character.
                if start >= skip && start < end {
                    text.push(c);
                }
                continue;
            }
            if col <= skip {
                continue;
            }
            if start >= end {
                break;
            }
            if start < skip || col > end {
                let visible = col.min(end) - start.max(skip);
                text.extend(std::iter::repeat(' ').take(visible));
                used += visible;
            } else {
                text.push(c);
                used += w;
            }
        }
        if text.is_empty() {
            continue;
        }

        let mut style = Style::default().fg(theme.syntax.color_for(span.class));
        if let Some(bg) = bg {
            style = style.bg(bg);
        }
        out.push(Span::styled(text, style));
    }

    // Extend the change background to the pane edge
    if let Some(bg) = bg {
        if used < width {
            out.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        }
    }
    out
}
