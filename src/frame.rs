//! Deferred work that runs at the start of the next UI frame.
//!
//! A frame is one pass of the app loop. Callers request a task, keep the
//! returned handle, and cancel it before requesting again so that each
//! concern has at most one task in flight.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Work the app loop knows how to run on a frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Return the scroll synchronizer to idle.
    ReleaseScrollLock,
    /// Repaint the connector gutter.
    PaintConnectors,
    /// Jump to the first hunk once the initial layout exists.
    RevealFirstHunk,
}

#[derive(Debug)]
pub struct FrameScheduler<T> {
    next_id: u64,
    pending: Vec<(FrameHandle, T)>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn request(&mut self, task: T) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push((handle, task));
        handle
    }

    /// Drop a task that has not run yet. Returns false if it already ran or
    /// was cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every task due this frame, in request order. Tasks requested
    /// while handling these land in the next frame.
    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(_, task)| task)
            .collect()
    }
}

/// Holds the handle of the single in-flight task for one concern.
#[derive(Debug, Default)]
pub struct FrameSlot {
    handle: Option<FrameHandle>,
}

impl FrameSlot {
    /// Cancel the previous request (if still pending) and request `task`.
    pub fn schedule<T>(&mut self, scheduler: &mut FrameScheduler<T>, task: T) {
        self.cancel(scheduler);
        self.handle = Some(scheduler.request(task));
    }

    pub fn cancel<T>(&mut self, scheduler: &mut FrameScheduler<T>) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
    }

    /// Mark the task as run.
    pub fn fired(&mut self) {
        self.handle = None;
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_request_order() {
        let mut frames = FrameScheduler::new();
        frames.request(FrameTask::PaintConnectors);
        frames.request(FrameTask::ReleaseScrollLock);
        assert_eq!(
            frames.drain(),
            vec![FrameTask::PaintConnectors, FrameTask::ReleaseScrollLock]
        );
        assert!(frames.is_empty());
    }

    #[test]
    fn test_cancel_removes_only_that_task() {
        let mut frames = FrameScheduler::new();
        let a = frames.request(1);
        let b = frames.request(2);
        assert!(frames.cancel(a));
        assert!(!frames.cancel(a));
        assert!(frames.is_pending(b));
        assert_eq!(frames.drain(), vec![2]);
    }

    #[test]
    fn test_slot_keeps_one_task_in_flight() {
        let mut frames = FrameScheduler::new();
        let mut slot = FrameSlot::default();
        for _ in 0..5 {
            slot.schedule(&mut frames, FrameTask::PaintConnectors);
        }
        assert_eq!(frames.len(), 1);
        assert!(slot.is_pending());
        assert_eq!(frames.drain(), vec![FrameTask::PaintConnectors]);
        slot.fired();
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_slot_cancel() {
        let mut frames = FrameScheduler::new();
        let mut slot = FrameSlot::default();
        slot.schedule(&mut frames, FrameTask::ReleaseScrollLock);
        slot.cancel(&mut frames);
        assert!(frames.is_empty());
        assert!(!slot.is_pending());
    }
}
