use crate::diff::{ChangeBlock, DiffModel, LineKind};
use crate::frame::{FrameScheduler, FrameTask};
use crate::sync::ScrollSynchronizer;

use super::pane_state::{PanePair, Side, LINE_HEIGHT};

/// Start indices (into `right_lines`) of every hunk, ascending and unique.
///
/// Added runs contribute their own start. Removed runs contribute the number
/// of right lines emitted before them, clamped to the last right line.
pub fn hunk_starts(model: &DiffModel) -> Vec<usize> {
    let mut starts = run_starts(model.right_lines.iter().map(|l| l.kind), LineKind::Added);

    let last_right = model.right_lines.len().saturating_sub(1);
    for left in run_starts(model.left_lines.iter().map(|l| l.kind), LineKind::Removed) {
        starts.push(right_index_before(model, left).min(last_right));
    }

    starts.sort_unstable();
    starts.dedup();
    starts
}

fn run_starts(kinds: impl Iterator<Item = LineKind>, wanted: LineKind) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_run = false;
    for (i, kind) in kinds.enumerate() {
        let hit = kind == wanted;
        if hit && !in_run {
            starts.push(i);
        }
        in_run = hit;
    }
    starts
}

/// Right lines emitted before the left line `left`. A removal run always
/// follows an alignment point at its own left index.
fn right_index_before(model: &DiffModel, left: usize) -> usize {
    let idx = model.alignment.partition_point(|p| p.left_index <= left);
    idx.checked_sub(1)
        .and_then(|i| model.alignment.get(i))
        .map_or(0, |p| p.right_index)
}

/// The change block a hunk start belongs to.
pub fn block_for_hunk(model: &DiffModel, line: usize) -> Option<&ChangeBlock> {
    let last_right = model.right_lines.len().saturating_sub(1);
    model
        .blocks
        .iter()
        .find(|b| b.right_start.min(last_right) == line)
}

/// Modified-side text of the hunk starting at `line`, newline-joined. Empty
/// for pure removals.
pub fn hunk_text(model: &DiffModel, line: usize) -> Option<String> {
    let block = block_for_hunk(model, line)?;
    let end = (block.right_start + block.right_count).min(model.right_lines.len());
    let lines: Vec<&str> = model
        .right_lines
        .get(block.right_start..end)
        .unwrap_or_default()
        .iter()
        .map(|l| l.text.as_str())
        .collect();
    Some(lines.join("\n"))
}

#[derive(Debug, Default)]
pub struct HunkNavigator {
    hunks: Vec<usize>,
    current: Option<usize>,
}

impl HunkNavigator {
    pub fn new(model: &DiffModel) -> Self {
        let hunks = hunk_starts(model);
        let current = if hunks.is_empty() { None } else { Some(0) };
        Self { hunks, current }
    }

    pub fn hunks(&self) -> &[usize] {
        &self.hunks
    }

    pub fn len(&self) -> usize {
        self.hunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Right-pane line of the current hunk.
    pub fn current_line(&self) -> Option<usize> {
        self.current.and_then(|i| self.hunks.get(i).copied())
    }

    pub fn next(&mut self) -> Option<usize> {
        if let Some(i) = self.current {
            self.current = Some((i + 1).min(self.hunks.len() - 1));
        }
        self.current
    }

    pub fn prev(&mut self) -> Option<usize> {
        if let Some(i) = self.current {
            self.current = Some(i.saturating_sub(1));
        }
        self.current
    }

    /// Make `index` current and scroll the modified pane to it. The resulting
    /// scroll event brings the original pane along through the synchronizer.
    pub fn go_to(
        &mut self,
        index: usize,
        panes: &mut PanePair,
        sync: &mut ScrollSynchronizer,
        frames: &mut FrameScheduler<FrameTask>,
    ) -> bool {
        let Some(&line) = self.hunks.get(index) else {
            return false;
        };
        self.current = Some(index);
        sync.reset(frames);
        panes.scroll_to(Side::Right, line as f64 * LINE_HEIGHT);
        tracing::debug!(index, line, "jumped to hunk");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{compute_diff, DiffOptions};
    use crate::highlight::PlainHighlighter;

    fn model(a: &str, b: &str) -> DiffModel {
        compute_diff(a, b, "text", &PlainHighlighter, &DiffOptions::default())
    }

    fn pump(
        sync: &mut ScrollSynchronizer,
        panes: &mut PanePair,
        model: &DiffModel,
        frames: &mut FrameScheduler<FrameTask>,
    ) {
        while let Some(event) = panes.next_event() {
            sync.on_scroll(event.side, panes, &model.alignment, frames);
        }
    }

    #[test]
    fn test_added_tail_hunk() {
        let m = model("a\nb", "a\nb\nc");
        assert_eq!(hunk_starts(&m), vec![2]);
    }

    #[test]
    fn test_removed_run_maps_to_right_index() {
        let m = model("a\nb\nc\nd", "a\nd");
        assert_eq!(hunk_starts(&m), vec![1]);
    }

    #[test]
    fn test_removed_at_end_is_clamped() {
        let m = model("a\nb\nc", "a");
        assert_eq!(hunk_starts(&m), vec![0]);
        let m = model("a\nb", "");
        assert_eq!(hunk_starts(&m), vec![0]);
    }

    #[test]
    fn test_modified_block_counts_once() {
        let m = model("a\nb\nc", "a\nx\nc");
        assert_eq!(hunk_starts(&m), vec![1]);
    }

    #[test]
    fn test_no_hunks_for_identical() {
        let m = model("a\nb", "a\nb");
        let nav = HunkNavigator::new(&m);
        assert!(nav.is_empty());
        assert_eq!(nav.current_index(), None);
    }

    #[test]
    fn test_navigation_clamps() {
        let m = model("a\nb\nc\nd\ne", "a\nX\nc\nd\ne\nf");
        let mut nav = HunkNavigator::new(&m);
        assert_eq!(nav.hunks(), &[1, 5]);
        assert_eq!(nav.current_index(), Some(0));
        assert_eq!(nav.prev(), Some(0));
        assert_eq!(nav.next(), Some(1));
        assert_eq!(nav.next(), Some(1));
        assert_eq!(nav.current_line(), Some(5));
    }

    #[test]
    fn test_empty_navigator_stays_empty() {
        let mut nav = HunkNavigator::default();
        assert_eq!(nav.next(), None);
        assert_eq!(nav.prev(), None);
    }

    #[test]
    fn test_go_to_scrolls_right_and_drives_left() {
        let original: Vec<String> = (0..60).map(|i| format!("l{i}")).collect();
        let mut modified = original.clone();
        modified.splice(30..30, (0..10).map(|i| format!("new{i}")));
        let m = model(&original.join("\n"), &modified.join("\n"));

        let mut panes = PanePair::new();
        panes.set_geometry(Side::Left, (60.0, 10.0), (10.0, 10.0));
        panes.set_geometry(Side::Right, (70.0, 10.0), (10.0, 10.0));
        let mut sync = ScrollSynchronizer::new(LINE_HEIGHT);
        let mut frames = FrameScheduler::new();
        let mut nav = HunkNavigator::new(&m);
        assert_eq!(nav.hunks(), &[30]);

        assert!(nav.go_to(0, &mut panes, &mut sync, &mut frames));
        pump(&mut sync, &mut panes, &m, &mut frames);
        assert_eq!(panes.pane(Side::Right).scroll_top(), 30.0);
        assert_eq!(panes.pane(Side::Left).scroll_top(), 30.0);
        assert!(!nav.go_to(3, &mut panes, &mut sync, &mut frames));
    }

    #[test]
    fn test_go_to_overrides_stale_lock() {
        let m = model("a\nb\nc\nd\ne\nf\ng\nh", "a\nb\nc\nd\ne\nf\ng\nX");
        let mut panes = PanePair::new();
        panes.set_geometry(Side::Left, (8.0, 10.0), (2.0, 10.0));
        panes.set_geometry(Side::Right, (8.0, 10.0), (2.0, 10.0));
        let mut sync = ScrollSynchronizer::new(LINE_HEIGHT);
        let mut frames = FrameScheduler::new();

        // Left is mid-pass; the right pane would normally be treated as echo.
        panes.scroll_to(Side::Left, 1.0);
        pump(&mut sync, &mut panes, &m, &mut frames);

        let mut nav = HunkNavigator::new(&m);
        nav.go_to(0, &mut panes, &mut sync, &mut frames);
        pump(&mut sync, &mut panes, &m, &mut frames);
        assert_eq!(panes.pane(Side::Right).scroll_top(), 6.0);
        assert_eq!(panes.pane(Side::Left).scroll_top(), 6.0);
    }

    #[test]
    fn test_hunk_text() {
        let m = model("a\nb\nc", "a\nx\ny\nc");
        assert_eq!(hunk_text(&m, 1).as_deref(), Some("x\ny"));
        let m = model("a\nb\nc\nd", "a\nd");
        assert_eq!(hunk_text(&m, 1).as_deref(), Some(""));
        assert_eq!(hunk_text(&m, 0), None);
    }
}
