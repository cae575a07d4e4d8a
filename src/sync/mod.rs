mod interpolate;

pub use interpolate::calculate_target_scroll;

use crate::diff::AlignmentPoint;
use crate::frame::{FrameScheduler, FrameSlot, FrameTask};
use crate::state::pane_state::{PanePair, Side};

/// Who is currently driving a synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Driving(Side),
}

/// Keeps the two panes vertically aligned and horizontally locked.
///
/// Writing to the target pane produces a scroll event of its own. While a
/// pass is in progress, events from the non-driving pane are dropped; the
/// lock is released on the next frame so those echoes drain first.
#[derive(Debug)]
pub struct ScrollSynchronizer {
    state: SyncState,
    release: FrameSlot,
    line_height: f64,
}

impl ScrollSynchronizer {
    pub fn new(line_height: f64) -> Self {
        Self {
            state: SyncState::Idle,
            release: FrameSlot::default(),
            line_height,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Handle a scroll event from `source`. Returns true when the other pane
    /// was synchronized, false when the event was an echo and ignored.
    pub fn on_scroll(
        &mut self,
        source: Side,
        panes: &mut PanePair,
        alignment: &[AlignmentPoint],
        frames: &mut FrameScheduler<FrameTask>,
    ) -> bool {
        if let SyncState::Driving(driver) = self.state {
            if driver != source {
                tracing::trace!(?source, ?driver, "ignoring echoed scroll");
                return false;
            }
        }

        // Lock before touching the target so its events are recognised as echoes.
        self.state = SyncState::Driving(source);

        let target = source.other();
        let src = panes.pane(source);
        let (src_top, src_left, src_scrollable) =
            (src.scroll_top(), src.scroll_left(), src.scrollable_height());
        let target_scrollable = panes.pane(target).scrollable_height();

        let target_top = calculate_target_scroll(
            src_top,
            src_scrollable,
            target_scrollable,
            alignment,
            self.line_height,
            source.is_left(),
        );

        panes.scroll_left_to(target, src_left);
        panes.scroll_to(target, target_top);

        self.release.schedule(frames, FrameTask::ReleaseScrollLock);
        true
    }

    /// Frame callback: the pass is over.
    pub fn release(&mut self) {
        self.release.fired();
        self.state = SyncState::Idle;
    }

    /// Abandon any pass in progress. Used before explicit navigation, which
    /// starts a fresh pass rather than continuing the previous one.
    pub fn reset(&mut self, frames: &mut FrameScheduler<FrameTask>) {
        self.release.cancel(frames);
        self.state = SyncState::Idle;
    }
}
