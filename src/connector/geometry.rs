use crate::diff::{BlockKind, ChangeBlock};

/// Zero-line blocks are drawn this many lines tall so they stay visible.
pub const MIN_BLOCK_LINES: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBezier {
    /// Horizontal S-curve from `(x0, y0)` to `(x1, y1)` whose control points
    /// sit on the vertical line `x = mid_x`.
    pub fn s_curve(x0: f64, y0: f64, x1: f64, y1: f64, mid_x: f64) -> Self {
        Self {
            p0: Point { x: x0, y: y0 },
            p1: Point { x: mid_x, y: y0 },
            p2: Point { x: mid_x, y: y1 },
            p3: Point { x: x1, y: y1 },
        }
    }

    pub fn at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point {
            x: a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
            y: a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
        }
    }
}

/// Closed connector shape: the top edge runs left to right, the bottom edge
/// runs back right to left, and straight verticals close both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: CubicBezier,
    pub bottom: CubicBezier,
    pub kind: BlockKind,
}

impl Band {
    /// Vertical cross-section at curve parameter `t` measured along the top
    /// edge. Both edges share control x-coordinates, so the bottom edge at
    /// `1 - t` lies at the same x.
    pub fn span_at(&self, t: f64) -> (f64, f64, f64) {
        let top = self.top.at(t);
        let bottom = self.bottom.at(1.0 - t);
        (top.x, top.y.min(bottom.y), top.y.max(bottom.y))
    }
}

/// Inputs for one connector repaint, all in gutter cell units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorScene<'a> {
    pub blocks: &'a [ChangeBlock],
    pub width: f64,
    pub height: f64,
    pub line_height: f64,
    pub left_scroll: f64,
    pub right_scroll: f64,
    /// Top of each pane's content area relative to the gutter top.
    pub left_offset: f64,
    pub right_offset: f64,
    /// Rows above this are header; nothing is drawn there.
    pub clip_top: f64,
    /// Rows at or below this are footer; nothing is drawn there.
    pub clip_bottom: f64,
}

/// Top and bottom y of a block's extent on one pane.
pub fn block_span(
    offset: f64,
    start: usize,
    count: usize,
    scroll: f64,
    line_height: f64,
) -> (f64, f64) {
    let top = offset + start as f64 * line_height - scroll;
    let bottom = offset + (start as f64 + (count as f64).max(MIN_BLOCK_LINES)) * line_height - scroll;
    (top, bottom)
}

fn outside(span: (f64, f64), clip_top: f64, clip_bottom: f64) -> bool {
    span.1 <= clip_top || span.0 >= clip_bottom
}

/// Build the band for a block, or `None` when both of its sides are fully
/// outside the visible content area.
pub fn band_for_block(block: &ChangeBlock, scene: &ConnectorScene<'_>) -> Option<Band> {
    let left = block_span(
        scene.left_offset,
        block.left_start,
        block.left_count,
        scene.left_scroll,
        scene.line_height,
    );
    let right = block_span(
        scene.right_offset,
        block.right_start,
        block.right_count,
        scene.right_scroll,
        scene.line_height,
    );

    if outside(left, scene.clip_top, scene.clip_bottom)
        && outside(right, scene.clip_top, scene.clip_bottom)
    {
        return None;
    }

    let mid = scene.width / 2.0;
    Some(Band {
        top: CubicBezier::s_curve(0.0, left.0, scene.width, right.0, mid),
        bottom: CubicBezier::s_curve(scene.width, right.1, 0.0, left.1, mid),
        kind: block.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(ls: usize, lc: usize, rs: usize, rc: usize, kind: BlockKind) -> ChangeBlock {
        ChangeBlock {
            left_start: ls,
            left_count: lc,
            right_start: rs,
            right_count: rc,
            kind,
        }
    }

    fn scene(blocks: &[ChangeBlock], left_scroll: f64, right_scroll: f64) -> ConnectorScene<'_> {
        ConnectorScene {
            blocks,
            width: 8.0,
            height: 22.0,
            line_height: 1.0,
            left_scroll,
            right_scroll,
            left_offset: 1.0,
            right_offset: 1.0,
            clip_top: 1.0,
            clip_bottom: 21.0,
        }
    }

    #[test]
    fn test_block_span_applies_offset_and_scroll() {
        assert_eq!(block_span(1.0, 10, 3, 4.0, 1.0), (7.0, 10.0));
        assert_eq!(block_span(2.0, 5, 2, 0.0, 16.0), (82.0, 114.0));
    }

    #[test]
    fn test_zero_count_gets_sliver() {
        let (top, bottom) = block_span(0.0, 4, 0, 0.0, 1.0);
        assert_eq!(bottom - top, MIN_BLOCK_LINES);
    }

    #[test]
    fn test_curve_endpoints() {
        let c = CubicBezier::s_curve(0.0, 2.0, 8.0, 6.0, 4.0);
        assert_eq!(c.at(0.0), Point { x: 0.0, y: 2.0 });
        assert_eq!(c.at(1.0), Point { x: 8.0, y: 6.0 });
        let mid = c.at(0.5);
        assert_eq!(mid.x, 4.0);
        assert_eq!(mid.y, 4.0);
    }

    #[test]
    fn test_band_edges_share_x() {
        let blocks = [block(2, 1, 5, 3, BlockKind::Modified)];
        let s = scene(&blocks, 0.0, 0.0);
        let band = band_for_block(&blocks[0], &s).unwrap();
        for step in 0..=10 {
            let t = step as f64 / 10.0;
            let (x, y0, y1) = band.span_at(t);
            assert!((band.bottom.at(1.0 - t).x - x).abs() < 1e-9);
            assert!(y0 <= y1);
        }
        assert_eq!(band.span_at(0.0), (0.0, 3.0, 4.0));
        assert_eq!(band.span_at(1.0), (8.0, 6.0, 9.0));
    }

    #[test]
    fn test_culls_blocks_outside_viewport() {
        let blocks = [
            block(0, 2, 0, 2, BlockKind::Modified),
            block(40, 1, 45, 0, BlockKind::Removed),
            block(10, 0, 12, 4, BlockKind::Added),
        ];
        let s = scene(&blocks, 30.0, 30.0);
        // Scrolled past the first block on both sides.
        assert!(band_for_block(&blocks[0], &s).is_none());
        // Still on screen.
        assert!(band_for_block(&blocks[1], &s).is_some());
        // Above the viewport on both sides.
        assert!(band_for_block(&blocks[2], &s).is_none());
    }

    #[test]
    fn test_one_visible_side_keeps_band() {
        let blocks = [block(5, 1, 80, 1, BlockKind::Modified)];
        let s = scene(&blocks, 0.0, 0.0);
        assert!(band_for_block(&blocks[0], &s).is_some());
    }
}
