use std::collections::VecDeque;

/// Height of one diff line in scroll units. Terminal panes scroll by rows.
pub const LINE_HEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn is_left(self) -> bool {
        self == Side::Left
    }
}

/// Emitted whenever a pane's scroll offset actually changes, whether the
/// user moved it or another component wrote to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub side: Side,
}

/// Scroll geometry of one pane, in rows and columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pane {
    scroll_top: f64,
    scroll_left: f64,
    content_height: f64,
    viewport_height: f64,
    content_width: f64,
    viewport_width: f64,
}

impl Pane {
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    /// First fully visible row.
    pub fn first_row(&self) -> usize {
        self.scroll_top.floor().max(0.0) as usize
    }

    pub fn first_column(&self) -> usize {
        self.scroll_left.floor().max(0.0) as usize
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Largest valid `scroll_top`.
    pub fn scrollable_height(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn scrollable_width(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    fn clamp_top(&self, top: f64) -> f64 {
        if top.is_finite() {
            top.clamp(0.0, self.scrollable_height())
        } else {
            0.0
        }
    }

    fn clamp_left(&self, left: f64) -> f64 {
        if left.is_finite() {
            left.clamp(0.0, self.scrollable_width())
        } else {
            0.0
        }
    }
}

/// The original (left) and modified (right) panes plus the queue of scroll
/// events their writes produce.
#[derive(Debug, Default)]
pub struct PanePair {
    left: Pane,
    right: Pane,
    events: VecDeque<ScrollEvent>,
}

impl PanePair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pane(&self, side: Side) -> &Pane {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn pane_mut(&mut self, side: Side) -> &mut Pane {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Update content and viewport sizes. Offsets are re-clamped without
    /// emitting events.
    pub fn set_geometry(
        &mut self,
        side: Side,
        content: (f64, f64),
        viewport: (f64, f64),
    ) {
        let pane = self.pane_mut(side);
        pane.content_height = content.0.max(0.0);
        pane.content_width = content.1.max(0.0);
        pane.viewport_height = viewport.0.max(0.0);
        pane.viewport_width = viewport.1.max(0.0);
        pane.scroll_top = pane.clamp_top(pane.scroll_top);
        pane.scroll_left = pane.clamp_left(pane.scroll_left);
    }

    /// Set the vertical offset. Queues a [`ScrollEvent`] if it changed.
    pub fn scroll_to(&mut self, side: Side, top: f64) -> bool {
        let pane = self.pane_mut(side);
        let top = pane.clamp_top(top);
        if top == pane.scroll_top {
            return false;
        }
        pane.scroll_top = top;
        self.events.push_back(ScrollEvent { side });
        true
    }

    pub fn scroll_by(&mut self, side: Side, delta: f64) -> bool {
        let top = self.pane(side).scroll_top + delta;
        self.scroll_to(side, top)
    }

    /// Set the horizontal offset. Queues a [`ScrollEvent`] if it changed.
    pub fn scroll_left_to(&mut self, side: Side, left: f64) -> bool {
        let pane = self.pane_mut(side);
        let left = pane.clamp_left(left);
        if left == pane.scroll_left {
            return false;
        }
        pane.scroll_left = left;
        self.events.push_back(ScrollEvent { side });
        true
    }

    pub fn next_event(&mut self) -> Option<ScrollEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(rows: f64, viewport: f64) -> PanePair {
        let mut panes = PanePair::new();
        for side in [Side::Left, Side::Right] {
            panes.set_geometry(side, (rows, 80.0), (viewport, 40.0));
        }
        panes
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut panes = pair(100.0, 20.0);
        panes.scroll_to(Side::Left, 500.0);
        assert_eq!(panes.pane(Side::Left).scroll_top(), 80.0);
        panes.scroll_to(Side::Left, -3.0);
        assert_eq!(panes.pane(Side::Left).scroll_top(), 0.0);
        panes.scroll_to(Side::Left, f64::NAN);
        assert_eq!(panes.pane(Side::Left).scroll_top(), 0.0);
    }

    #[test]
    fn test_only_changes_emit_events() {
        let mut panes = pair(100.0, 20.0);
        assert!(panes.scroll_to(Side::Right, 10.0));
        assert!(!panes.scroll_to(Side::Right, 10.0));
        assert_eq!(panes.next_event(), Some(ScrollEvent { side: Side::Right }));
        assert_eq!(panes.next_event(), None);
    }

    #[test]
    fn test_short_content_cannot_scroll() {
        let mut panes = pair(5.0, 20.0);
        assert_eq!(panes.pane(Side::Left).scrollable_height(), 0.0);
        assert!(!panes.scroll_by(Side::Left, 3.0));
        assert_eq!(panes.next_event(), None);
    }

    #[test]
    fn test_geometry_reclamps_silently() {
        let mut panes = pair(100.0, 20.0);
        panes.scroll_to(Side::Left, 70.0);
        panes.next_event();
        panes.set_geometry(Side::Left, (50.0, 80.0), (20.0, 40.0));
        assert_eq!(panes.pane(Side::Left).scroll_top(), 30.0);
        assert_eq!(panes.next_event(), None);
    }

    #[test]
    fn test_horizontal_scroll() {
        let mut panes = pair(100.0, 20.0);
        assert!(panes.scroll_left_to(Side::Left, 15.0));
        assert_eq!(panes.pane(Side::Left).first_column(), 15);
        panes.scroll_left_to(Side::Left, 1000.0);
        assert_eq!(panes.pane(Side::Left).scroll_left(), 40.0);
    }
}
