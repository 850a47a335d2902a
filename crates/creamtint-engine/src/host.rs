//! Host service traits.
//!
//! The pipeline needs exactly two things from its host environment: a way to
//! resume after the next rendering opportunity (the browser's
//! `requestAnimationFrame`) and a feed of subtree insertions (the browser's
//! `MutationObserver` with `childList` + `subtree`). Both are abstracted
//! here so a synchronous harness can drive the engine deterministically.

use std::collections::VecDeque;

use creamtint_dom::NodeId;

/// Single-shot "resume on the next rendering opportunity" primitive.
///
/// [HTML § 8.1.4.3 animation frame callbacks](https://html.spec.whatwg.org/multipage/imagebitmap-and-animations.html#animation-frames)
///
/// The scanner calls [`yield_to_frame`](Self::yield_to_frame) between
/// slices. A browser host would suspend until its frame callback fires; a
/// synchronous host may return immediately.
pub trait FrameScheduler {
    /// Block (or cooperatively suspend) until the next rendering
    /// opportunity.
    fn yield_to_frame(&mut self);
}

/// Frame scheduler that resumes immediately and counts how many frames were
/// requested. Used by the CLI report and by tests asserting slice behavior.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    frames: usize,
}

impl CountingScheduler {
    /// Create a scheduler with no frames recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the scanner yielded.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl FrameScheduler for CountingScheduler {
    fn yield_to_frame(&mut self) {
        self.frames += 1;
    }
}

/// One delivered batch of subtree insertions.
///
/// [DOM § 4.3.3 MutationRecord](https://dom.spec.whatwg.org/#interface-mutationrecord)
/// "addedNodes ... return the nodes added" - the directly inserted nodes
/// only, in insertion order; their descendants travel implicitly with them.
/// Non-element ids may appear (text insertions) and are ignored by the
/// watcher.
#[derive(Debug, Clone, Default)]
pub struct InsertionBatch {
    /// Directly inserted nodes, in insertion order.
    pub added: Vec<NodeId>,
}

impl InsertionBatch {
    /// Create a batch from the directly inserted node ids.
    #[must_use]
    pub fn new(added: Vec<NodeId>) -> Self {
        Self { added }
    }
}

/// Lazy, non-restartable feed of insertion batches.
///
/// `None` means no batch is currently available; the page outlives any
/// single drain, so a host may deliver more batches later and drain again.
/// Consumed batches are never redelivered.
pub trait SubtreeChangeSource {
    /// Take the next pending insertion batch, if any.
    fn next_batch(&mut self) -> Option<InsertionBatch>;
}

/// Queue-backed change source for synchronous hosts and tests.
#[derive(Debug, Default)]
pub struct QueuedChanges {
    queue: VecDeque<InsertionBatch>,
}

impl QueuedChanges {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch for delivery.
    pub fn push(&mut self, batch: InsertionBatch) {
        self.queue.push_back(batch);
    }
}

impl SubtreeChangeSource for QueuedChanges {
    fn next_batch(&mut self) -> Option<InsertionBatch> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_changes_deliver_in_order_and_once() {
        let mut source = QueuedChanges::new();
        source.push(InsertionBatch::new(vec![NodeId(1)]));
        source.push(InsertionBatch::new(vec![NodeId(2), NodeId(3)]));

        assert_eq!(source.next_batch().unwrap().added, vec![NodeId(1)]);
        assert_eq!(source.next_batch().unwrap().added, vec![NodeId(2), NodeId(3)]);
        assert!(source.next_batch().is_none());
    }

    #[test]
    fn counting_scheduler_records_yields() {
        let mut scheduler = CountingScheduler::new();
        assert_eq!(scheduler.frames(), 0);
        scheduler.yield_to_frame();
        scheduler.yield_to_frame();
        assert_eq!(scheduler.frames(), 2);
    }
}
