use ratatui::{buffer::Buffer, layout::Rect, style::Color};
use serde::Deserialize;

use super::geometry::{Band, CubicBezier};

/// Glyph set used to rasterize connectors. Finer markers pack more dots per
/// terminal cell, the same way a high-DPI canvas packs more pixels per CSS
/// pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    #[default]
    Braille,
    HalfBlock,
    Block,
}

impl Marker {
    /// Dots per cell as `(columns, rows)`.
    pub fn ratio(self) -> (u16, u16) {
        match self {
            Marker::Braille => (2, 4),
            Marker::HalfBlock => (1, 2),
            Marker::Block => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ink {
    Fill(Color),
    Stroke(Color),
}

/// Off-screen backing store for the gutter: `cols·rx` by `rows·ry` dots.
/// Drawing calls take cell coordinates and scale them by the marker ratio.
#[derive(Debug, Clone)]
pub struct Surface {
    cols: u16,
    rows: u16,
    marker: Marker,
    dots: Vec<Option<Ink>>,
    clip_top: usize,
    clip_bottom: usize,
}

impl Surface {
    pub fn new(cols: u16, rows: u16, marker: Marker) -> Self {
        let (rx, ry) = marker.ratio();
        let (w, h) = (cols as usize * rx as usize, rows as usize * ry as usize);
        Self {
            cols,
            rows,
            marker,
            dots: vec![None; w * h],
            clip_top: 0,
            clip_bottom: h,
        }
    }

    /// Backing store size in dots.
    pub fn dot_size(&self) -> (usize, usize) {
        let (rx, ry) = self.marker.ratio();
        (self.cols as usize * rx as usize, self.rows as usize * ry as usize)
    }

    pub fn clear(&mut self) {
        self.dots.fill(None);
    }

    /// Restrict drawing to cell rows `[top, bottom)`.
    pub fn set_clip(&mut self, top: f64, bottom: f64) {
        let (_, ry) = self.marker.ratio();
        let (_, h) = self.dot_size();
        let to_dot = |y: f64| ((y.max(0.0) * ry as f64).ceil() as usize).min(h);
        self.clip_top = to_dot(top);
        self.clip_bottom = to_dot(bottom).max(self.clip_top);
    }

    fn put(&mut self, x: i64, y: i64, ink: Ink) {
        let (w, _) = self.dot_size();
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= w || y < self.clip_top || y >= self.clip_bottom {
            return;
        }
        let dot = &mut self.dots[y * w + x];
        // Strokes win over fills in the same dot.
        if !matches!(dot, Some(Ink::Stroke(_))) || matches!(ink, Ink::Stroke(_)) {
            *dot = Some(ink);
        }
    }

    fn samples(&self) -> usize {
        let (w, _) = self.dot_size();
        (w * 4).max(16)
    }

    /// Fill the region enclosed by a band.
    pub fn fill_band(&mut self, band: &Band, color: Color) {
        let (rx, ry) = self.marker.ratio();
        let (rx, ry) = (rx as f64, ry as f64);
        let n = self.samples();
        for i in 0..=n {
            let t = i as f64 / n as f64;
            let (x, y0, y1) = band.span_at(t);
            let dx = (x * rx).floor().min(self.dot_size().0 as f64 - 1.0) as i64;
            let first = (y0 * ry).floor() as i64;
            let last = ((y1 * ry).ceil() as i64 - 1).max(first);
            for dy in first..=last {
                self.put(dx, dy, Ink::Fill(color));
            }
        }
    }

    /// Trace a curve one dot wide.
    pub fn stroke_curve(&mut self, curve: &CubicBezier, color: Color) {
        let (rx, ry) = self.marker.ratio();
        let (rx, ry) = (rx as f64, ry as f64);
        let n = self.samples();
        for i in 0..=n {
            let p = curve.at(i as f64 / n as f64);
            let dx = (p.x * rx).floor().min(self.dot_size().0 as f64 - 1.0) as i64;
            let dy = (p.y * ry).floor() as i64;
            self.put(dx, dy, Ink::Stroke(color));
        }
    }

    /// Whether any dot in the given cell is set.
    pub fn cell_is_set(&self, col: u16, row: u16) -> bool {
        self.cell_dots(col, row).next().is_some()
    }

    fn cell_dots(&self, col: u16, row: u16) -> impl Iterator<Item = (u16, u16, Ink)> + '_ {
        let (rx, ry) = self.marker.ratio();
        let (w, _) = self.dot_size();
        (0..ry).flat_map(move |sy| (0..rx).map(move |sx| (sx, sy))).filter_map(move |(sx, sy)| {
            let x = col as usize * rx as usize + sx as usize;
            let y = row as usize * ry as usize + sy as usize;
            self.dots.get(y * w + x).copied().flatten().map(|ink| (sx, sy, ink))
        })
    }

    /// Copy the surface into `buf`, one glyph per cell. Unset cells are left
    /// untouched.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let mut bits = 0u8;
                let mut fill = None;
                let mut stroke = None;
                for (sx, sy, ink) in self.cell_dots(col, row) {
                    bits |= dot_bit(self.marker, sx, sy);
                    match ink {
                        Ink::Fill(c) => fill = fill.or(Some(c)),
                        Ink::Stroke(c) => stroke = stroke.or(Some(c)),
                    }
                }
                let Some(color) = stroke.or(fill) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(glyph(self.marker, bits)).set_fg(color);
                }
            }
        }
    }
}

/// Bit for sub-cell dot `(sx, sy)` within a cell.
fn dot_bit(marker: Marker, sx: u16, sy: u16) -> u8 {
    match marker {
        // Unicode braille dot numbering: columns of 1-2-3-7 and 4-5-6-8.
        Marker::Braille => match (sx, sy) {
            (0, 0) => 0x01,
            (0, 1) => 0x02,
            (0, 2) => 0x04,
            (1, 0) => 0x08,
            (1, 1) => 0x10,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        },
        Marker::HalfBlock => 1 << sy,
        Marker::Block => 1,
    }
}

fn glyph(marker: Marker, bits: u8) -> char {
    match marker {
        Marker::Braille => char::from_u32(0x2800 + bits as u32).unwrap_or(' '),
        Marker::HalfBlock => match bits {
            0b01 => '▀',
            0b10 => '▄',
            _ => '█',
        },
        Marker::Block => '█',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::geometry::CubicBezier;
    use crate::diff::BlockKind;

    fn flat_band(y0: f64, y1: f64, width: f64) -> Band {
        Band {
            top: CubicBezier::s_curve(0.0, y0, width, y0, width / 2.0),
            bottom: CubicBezier::s_curve(width, y1, 0.0, y1, width / 2.0),
            kind: BlockKind::Modified,
        }
    }

    #[test]
    fn test_backing_store_scales_with_marker() {
        assert_eq!(Surface::new(6, 10, Marker::Braille).dot_size(), (12, 40));
        assert_eq!(Surface::new(6, 10, Marker::HalfBlock).dot_size(), (6, 20));
        assert_eq!(Surface::new(6, 10, Marker::Block).dot_size(), (6, 10));
    }

    #[test]
    fn test_fill_covers_band_rows() {
        let mut surface = Surface::new(4, 10, Marker::Block);
        surface.fill_band(&flat_band(2.0, 5.0, 4.0), Color::Blue);
        for col in 0..4 {
            assert!(!surface.cell_is_set(col, 1));
            assert!(surface.cell_is_set(col, 2));
            assert!(surface.cell_is_set(col, 4));
            assert!(!surface.cell_is_set(col, 5));
        }
    }

    #[test]
    fn test_half_line_sliver_visible_in_braille() {
        let mut surface = Surface::new(4, 10, Marker::Braille);
        surface.fill_band(&flat_band(3.0, 3.5, 4.0), Color::Green);
        assert!(surface.cell_is_set(0, 3));
        assert!(!surface.cell_is_set(0, 4));
    }

    #[test]
    fn test_clip_hides_header_rows() {
        let mut surface = Surface::new(4, 10, Marker::Braille);
        surface.set_clip(1.0, 9.0);
        surface.fill_band(&flat_band(-3.0, 12.0, 4.0), Color::Red);
        assert!(!surface.cell_is_set(0, 0));
        assert!(surface.cell_is_set(0, 1));
        assert!(surface.cell_is_set(3, 8));
        assert!(!surface.cell_is_set(3, 9));
    }

    #[test]
    fn test_render_braille_glyphs() {
        let mut surface = Surface::new(2, 2, Marker::Braille);
        surface.fill_band(&flat_band(0.0, 1.0, 2.0), Color::Yellow);
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        surface.render(area, &mut buf);
        // A full cell of braille dots.
        assert_eq!(buf[(0, 0)].symbol(), "\u{28ff}");
        assert_eq!(buf[(0, 0)].fg, Color::Yellow);
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }

    #[test]
    fn test_stroke_overrides_fill_colour() {
        let mut surface = Surface::new(2, 2, Marker::Block);
        let band = flat_band(0.0, 2.0, 2.0);
        surface.fill_band(&band, Color::DarkGray);
        surface.stroke_curve(&band.top, Color::White);
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        surface.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].fg, Color::White);
        assert_eq!(buf[(0, 1)].fg, Color::DarkGray);
    }
}
