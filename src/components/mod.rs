pub mod action_hud;
pub mod context_bar;
pub mod diff_view;
pub mod key_hints;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::state::AppState;

/// Columns between the two panes reserved for connectors.
pub const GUTTER_WIDTH: u16 = 8;

/// Trait for renderable TUI components.
pub trait Component {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);
}

/// Where everything goes on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub context_bar: Rect,
    pub left: Rect,
    pub gutter: Rect,
    pub right: Rect,
    pub hud: Rect,
}

pub fn screen_layout(area: Rect, show_gutter: bool) -> ScreenLayout {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let gutter = if show_gutter { GUTTER_WIDTH } else { 0 };
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(gutter),
            Constraint::Fill(1),
        ])
        .split(outer[1]);

    ScreenLayout {
        context_bar: outer[0],
        left: main[0],
        gutter: main[1],
        right: main[2],
        hud: outer[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{compute_diff, DiffOptions};
    use crate::highlight::PlainHighlighter;
    use crate::theme::Theme;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    #[test]
    fn test_layout_splits_panes_around_gutter() {
        let layout = screen_layout(Rect::new(0, 0, 88, 30), true);
        assert_eq!(layout.context_bar.height, 1);
        assert_eq!(layout.hud.y, 29);
        assert_eq!(layout.gutter.width, GUTTER_WIDTH);
        assert_eq!(layout.left.width, 40);
        assert_eq!(layout.right.x, 48);
        assert_eq!(layout.gutter.y, layout.left.y);
        assert_eq!(layout.gutter.height, layout.left.height);
    }

    #[test]
    fn test_layout_without_gutter() {
        let layout = screen_layout(Rect::new(0, 0, 80, 30), false);
        assert_eq!(layout.gutter.width, 0);
        assert_eq!(layout.left.width + layout.right.width, 80);
    }

    #[test]
    fn test_context_bar_shows_stats_and_hunk() {
        let model = compute_diff("a\nb", "a\nc\nd", "", &PlainHighlighter, &DiffOptions::default());
        let mut state = AppState::new(Arc::new(model), Theme::from_name("one-dark"), "rust".into());
        state.left_title = "a.rs".into();
        state.right_title = "b.rs".into();

        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                context_bar::ContextBar.render(frame, area, &state)
            })
            .unwrap();
        let text: String = (0..80)
            .map(|x| terminal.backend().buffer()[(x, 0)].symbol().to_string())
            .collect();
        assert!(text.contains("a.rs \u{2192} b.rs"));
        assert!(text.contains("+2 -1"));
        assert!(text.contains("[hunk 1/1]"));
        assert!(text.contains("[rust]"));
    }
}
