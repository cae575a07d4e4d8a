//! Gutter connectors: bezier bands linking each change on the original pane
//! to its counterpart on the modified pane.
//!
//! Painting happens outside the component render pass. The app asks for a
//! paint with [`ConnectorRenderer::schedule_paint`], runs
//! [`ConnectorRenderer::paint_now`] when the frame task fires, and blits the
//! last painted surface on every draw.

pub mod geometry;
pub mod surface;

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::diff::BlockKind;
use crate::frame::{FrameScheduler, FrameSlot, FrameTask};
use crate::theme::{blend, Theme};

pub use geometry::{band_for_block, ConnectorScene};
pub use surface::{Marker, Surface};

/// How strongly the fill leans toward the stroke color over the background.
const FILL_STRENGTH: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub fill: Color,
    pub stroke: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorPalette {
    pub modified: Ink,
    pub added: Ink,
    pub removed: Ink,
}

impl ConnectorPalette {
    pub fn from_theme(theme: &Theme) -> Self {
        let ink = |kind| {
            let stroke = theme.connector_color(kind);
            Ink {
                fill: blend(stroke, theme.surface, FILL_STRENGTH),
                stroke,
            }
        };
        Self {
            modified: ink(BlockKind::Modified),
            added: ink(BlockKind::Added),
            removed: ink(BlockKind::Removed),
        }
    }

    pub fn ink(&self, kind: BlockKind) -> Ink {
        match kind {
            BlockKind::Modified => self.modified,
            BlockKind::Added => self.added,
            BlockKind::Removed => self.removed,
        }
    }
}

/// Remembers the last gutter rectangle and reports when it changes.
#[derive(Debug, Default)]
struct ResizeWatch {
    last: Option<Rect>,
}

impl ResizeWatch {
    fn observe(&mut self, area: Rect) -> bool {
        if self.last == Some(area) {
            return false;
        }
        self.last = Some(area);
        true
    }
}

#[derive(Debug)]
pub struct ConnectorRenderer {
    marker: Marker,
    palette: ConnectorPalette,
    surface: Option<Surface>,
    paint: FrameSlot,
    resize: Option<ResizeWatch>,
    paints: u64,
}

impl ConnectorRenderer {
    pub fn new(marker: Marker, palette: ConnectorPalette) -> Self {
        Self {
            marker,
            palette,
            surface: None,
            paint: FrameSlot::default(),
            resize: Some(ResizeWatch::default()),
            paints: 0,
        }
    }

    pub fn set_palette(&mut self, palette: ConnectorPalette) {
        self.palette = palette;
    }

    pub fn is_disposed(&self) -> bool {
        self.resize.is_none()
    }

    /// Number of completed paints.
    pub fn paints(&self) -> u64 {
        self.paints
    }

    pub fn paint_pending(&self) -> bool {
        self.paint.is_pending()
    }

    /// Feed the current gutter rectangle. On a size change the backing store
    /// is reallocated and a paint is scheduled.
    pub fn observe(&mut self, area: Rect, frames: &mut FrameScheduler<FrameTask>) -> bool {
        let Some(watch) = self.resize.as_mut() else {
            return false;
        };
        if !watch.observe(area) {
            return false;
        }
        tracing::debug!(width = area.width, height = area.height, "gutter resized");
        self.surface = Some(Surface::new(area.width, area.height, self.marker));
        self.schedule_paint(frames);
        true
    }

    /// Request a paint on the next frame, replacing any request that has not
    /// run yet.
    pub fn schedule_paint(&mut self, frames: &mut FrameScheduler<FrameTask>) {
        if self.is_disposed() {
            return;
        }
        self.paint.schedule(frames, FrameTask::PaintConnectors);
    }

    /// Repaint the surface from `scene`. Returns the number of bands drawn.
    pub fn paint_now(&mut self, scene: &ConnectorScene<'_>) -> usize {
        self.paint.fired();
        if self.is_disposed() {
            return 0;
        }
        let Some(surface) = self.surface.as_mut() else {
            return 0;
        };
        surface.clear();
        if scene.width < 2.0 || scene.height <= 0.0 {
            return 0;
        }
        surface.set_clip(scene.clip_top, scene.clip_bottom);

        let mut drawn = 0;
        for block in scene.blocks {
            let Some(band) = band_for_block(block, scene) else {
                continue;
            };
            let ink = self.palette.ink(band.kind);
            surface.fill_band(&band, ink.fill);
            surface.stroke_curve(&band.top, ink.stroke);
            surface.stroke_curve(&band.bottom, ink.stroke);
            drawn += 1;
        }
        self.paints += 1;
        tracing::trace!(drawn, blocks = scene.blocks.len(), "painted connectors");
        drawn
    }

    /// Copy the last painted surface into the frame buffer.
    pub fn blit(&self, area: Rect, buf: &mut Buffer) {
        if let Some(surface) = &self.surface {
            surface.render(area, buf);
        }
    }

    /// Detach the resize watch, cancel a pending paint and drop the surface.
    pub fn dispose(&mut self, frames: &mut FrameScheduler<FrameTask>) {
        if self.is_disposed() {
            return;
        }
        self.paint.cancel(frames);
        self.resize = None;
        self.surface = None;
        tracing::debug!("connector renderer disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeBlock;

    fn renderer() -> ConnectorRenderer {
        ConnectorRenderer::new(
            Marker::Braille,
            ConnectorPalette::from_theme(&Theme::from_name("one-dark")),
        )
    }

    fn scene(blocks: &[ChangeBlock], width: f64) -> ConnectorScene<'_> {
        ConnectorScene {
            blocks,
            width,
            height: 20.0,
            line_height: 1.0,
            left_scroll: 0.0,
            right_scroll: 0.0,
            left_offset: 1.0,
            right_offset: 1.0,
            clip_top: 1.0,
            clip_bottom: 19.0,
        }
    }

    fn blocks() -> Vec<ChangeBlock> {
        vec![
            ChangeBlock {
                left_start: 1,
                left_count: 1,
                right_start: 1,
                right_count: 1,
                kind: BlockKind::Modified,
            },
            ChangeBlock {
                left_start: 4,
                left_count: 0,
                right_start: 4,
                right_count: 3,
                kind: BlockKind::Added,
            },
        ]
    }

    #[test]
    fn test_schedule_paint_is_throttled() {
        let mut frames = FrameScheduler::new();
        let mut r = renderer();
        for _ in 0..4 {
            r.schedule_paint(&mut frames);
        }
        assert_eq!(frames.len(), 1);
        assert!(r.paint_pending());
    }

    #[test]
    fn test_resize_allocates_and_schedules() {
        let mut frames = FrameScheduler::new();
        let mut r = renderer();
        let gutter = Rect::new(40, 0, 8, 20);
        assert!(r.observe(gutter, &mut frames));
        assert!(!r.observe(gutter, &mut frames));
        assert_eq!(frames.drain(), vec![FrameTask::PaintConnectors]);
        assert!(r.observe(Rect::new(40, 0, 8, 30), &mut frames));
    }

    #[test]
    fn test_paint_draws_visible_bands() {
        let mut frames = FrameScheduler::new();
        let mut r = renderer();
        r.observe(Rect::new(0, 0, 8, 20), &mut frames);
        frames.drain();
        let blocks = blocks();
        assert_eq!(r.paint_now(&scene(&blocks, 8.0)), 2);
        assert_eq!(r.paints(), 1);
        assert!(!r.paint_pending());

        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 20));
        r.blit(Rect::new(0, 0, 8, 20), &mut buf);
        // The modified band spans row 2 on both sides.
        assert_ne!(buf[(0, 2)].symbol(), " ");
        assert_ne!(buf[(7, 2)].symbol(), " ");
        // Header row stays clear.
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_narrow_gutter_is_noop() {
        let mut frames = FrameScheduler::new();
        let mut r = renderer();
        r.observe(Rect::new(0, 0, 1, 20), &mut frames);
        let blocks = blocks();
        assert_eq!(r.paint_now(&scene(&blocks, 1.0)), 0);
    }

    #[test]
    fn test_paint_without_surface_is_noop() {
        let mut r = renderer();
        let blocks = blocks();
        assert_eq!(r.paint_now(&scene(&blocks, 8.0)), 0);
        assert_eq!(r.paints(), 0);
    }

    #[test]
    fn test_dispose_cancels_and_detaches() {
        let mut frames = FrameScheduler::new();
        let mut r = renderer();
        r.observe(Rect::new(0, 0, 8, 20), &mut frames);
        assert!(!frames.is_empty());
        r.dispose(&mut frames);
        assert!(frames.is_empty());
        assert!(r.is_disposed());
        assert!(!r.observe(Rect::new(0, 0, 9, 20), &mut frames));
        r.schedule_paint(&mut frames);
        assert!(frames.is_empty());
        let blocks = blocks();
        assert_eq!(r.paint_now(&scene(&blocks, 8.0)), 0);
        // Second dispose is harmless.
        r.dispose(&mut frames);
    }

    #[test]
    fn test_palette_follows_theme() {
        let theme = Theme::from_name("github-dark");
        let palette = ConnectorPalette::from_theme(&theme);
        assert_eq!(palette.ink(BlockKind::Added).stroke, theme.connector_added);
        assert_ne!(palette.ink(BlockKind::Added).fill, theme.connector_added);
    }
}
