use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

use crate::diff::DiffModel;
use crate::theme::Theme;

use super::hunk_state::HunkNavigator;
use super::pane_state::{PanePair, Side};

pub struct AppState {
    pub model: Arc<DiffModel>,
    pub panes: PanePair,
    pub focus: Side,
    pub hunks: HunkNavigator,
    pub theme: Theme,
    pub left_title: String,
    pub right_title: String,
    pub grammar: String,
    /// Widest line on each side, in display columns. Drives horizontal scroll range.
    pub max_width: (usize, usize),
    pub connectors_enabled: bool,
    pub show_hints: bool,
    pub should_quit: bool,
    pub status_message: Option<(String, bool)>, // (message, is_error)
}

impl AppState {
    pub fn new(model: Arc<DiffModel>, theme: Theme, grammar: String) -> Self {
        Self {
            hunks: HunkNavigator::new(&model),
            max_width: widest_lines(&model),
            model,
            panes: PanePair::new(),
            focus: Side::Right,
            theme,
            left_title: String::new(),
            right_title: String::new(),
            grammar,
            connectors_enabled: true,
            show_hints: false,
            should_quit: false,
            status_message: None,
        }
    }

    /// Install a freshly computed model. Hunks are rebuilt; scroll offsets are
    /// kept and re-clamped on the next layout pass.
    pub fn set_model(&mut self, model: Arc<DiffModel>) {
        self.hunks = HunkNavigator::new(&model);
        self.max_width = widest_lines(&model);
        self.model = model;
    }

    pub fn max_width(&self, side: Side) -> usize {
        match side {
            Side::Left => self.max_width.0,
            Side::Right => self.max_width.1,
        }
    }

    /// Line-number column width for the pane, without the marker column.
    pub fn number_width(&self, side: Side) -> usize {
        let count = self.model.lines(side.is_left()).len();
        count.max(1).to_string().len()
    }
}

fn widest_lines(model: &DiffModel) -> (usize, usize) {
    let widest = |left: bool| {
        model
            .lines(left)
            .iter()
            .map(|l| l.markup.spans().iter().map(|s| s.text.width()).sum::<usize>())
            .max()
            .unwrap_or(0)
    };
    (widest(true), widest(false))
}
